// src/models/post.rs

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use validator::Validate;

use crate::error::AppError;
use crate::models::location::{LocationMethod, ViewerLocation};

/// Days a post stays live before expiring.
pub const POST_TTL_DAYS: i64 = 30;

/// Days before expiration during which a post counts as "expiring soon".
pub const EXPIRING_WINDOW_DAYS: i64 = 3;

/// The four listing intents. A closed set: adding a category is a
/// compile-time-visible change wherever category drives behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Request,
    Offer,
    Exchange,
    Sale,
}

/// Feed category filter: everything, or exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Request,
    Offer,
    Exchange,
    Sale,
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Request => category == Category::Request,
            CategoryFilter::Offer => category == Category::Offer,
            CategoryFilter::Exchange => category == Category::Exchange,
            CategoryFilter::Sale => category == Category::Sale,
        }
    }
}

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Represents the 'posts' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub category: Category,
    pub title: String,
    pub description: String,

    /// Opaque image references (data URLs or external URLs), at most 4.
    pub images: Json<Vec<String>>,

    pub lat: f64,
    pub lng: f64,
    pub postal_code: String,

    pub responses_count: i64,
    pub reports_count: i64,

    /// Set by the expiration sweep. The feed treats the timestamp as
    /// authoritative and never trusts this flag alone.
    pub is_expired: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Post {
    /// The expiration timestamp for a post created or extended at `now`.
    pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(POST_TTL_DAYS)
    }

    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Inside the window where the owner is prompted to extend. Posts already
    /// past their expiration (flag flipped or not) are also in the window.
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired && self.expires_at <= now + Duration::days(EXPIRING_WINDOW_DAYS)
    }
}

/// DTO for creating a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    pub category: Category,

    #[validate(length(
        min = 5,
        max = 100,
        message = "Title length must be between 5 and 100 chars"
    ))]
    pub title: String,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description length must be between 10 and 2000 chars"
    ))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 4, message = "At most 4 images per post"))]
    pub images: Vec<String>,

    pub coordinates: Coordinates,
    pub postal_code: String,
}

/// DTO for updating a post. Only supplied fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    pub category: Option<Category>,

    #[validate(length(
        min = 5,
        max = 100,
        message = "Title length must be between 5 and 100 chars"
    ))]
    pub title: Option<String>,

    #[validate(length(
        min = 10,
        max = 2000,
        message = "Description length must be between 10 and 2000 chars"
    ))]
    pub description: Option<String>,

    #[validate(length(max = 4, message = "At most 4 images per post"))]
    pub images: Option<Vec<String>>,
}

/// Query parameters for the feed.
#[derive(Debug, Deserialize)]
pub struct FeedParams {
    /// Free-text search over title and description.
    pub search: Option<String>,

    #[serde(default)]
    pub category: CategoryFilter,

    pub lat: Option<f64>,
    pub lng: Option<f64>,

    #[serde(default)]
    pub method: LocationMethod,

    /// Radius in km; defaults and caps come from config.
    pub radius_km: Option<f64>,
}

impl FeedParams {
    /// The viewer location, if the declared method carries a coordinate.
    pub fn viewer(&self) -> Result<Option<ViewerLocation>, AppError> {
        if !self.method.has_coordinates() {
            return Ok(None);
        }
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(Some(ViewerLocation {
                lat,
                lng,
                method: self.method,
            })),
            _ => Err(AppError::Validation(
                "lat and lng are required when a location method is set".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_expiring_at(expires_at: DateTime<Utc>) -> Post {
        let now = Utc::now();
        Post {
            id: 1,
            user_id: 1,
            category: Category::Offer,
            title: "Taladro disponible".to_string(),
            description: "Taladro en buen estado para prestar".to_string(),
            images: Json(vec![]),
            lat: 40.4168,
            lng: -3.7038,
            postal_code: "28001".to_string(),
            responses_count: 0,
            reports_count: 0,
            is_expired: false,
            created_at: now,
            updated_at: now,
            expires_at,
        }
    }

    #[test]
    fn expiry_is_exactly_thirty_days_out() {
        let now = Utc::now();
        assert_eq!(Post::expiry_from(now) - now, Duration::days(30));
    }

    #[test]
    fn expiring_window_covers_the_last_three_days() {
        let now = Utc::now();

        let fresh = post_expiring_at(now + Duration::days(10));
        assert!(!fresh.is_expiring_soon(now));
        assert!(!fresh.is_past_expiry(now));

        let closing = post_expiring_at(now + Duration::days(2));
        assert!(closing.is_expiring_soon(now));
        assert!(!closing.is_past_expiry(now));

        let overdue = post_expiring_at(now - Duration::hours(1));
        assert!(overdue.is_expiring_soon(now));
        assert!(overdue.is_past_expiry(now));
    }

    #[test]
    fn expired_flag_removes_post_from_expiring_list() {
        let now = Utc::now();
        let mut post = post_expiring_at(now + Duration::days(1));
        post.is_expired = true;
        assert!(!post.is_expiring_soon(now));
    }

    #[test]
    fn category_filter_matches_exhaustively() {
        assert!(CategoryFilter::All.matches(Category::Sale));
        assert!(CategoryFilter::Request.matches(Category::Request));
        assert!(!CategoryFilter::Request.matches(Category::Offer));
        assert!(CategoryFilter::Exchange.matches(Category::Exchange));
    }
}
