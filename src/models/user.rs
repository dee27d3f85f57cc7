// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Bio assigned at registration when the user does not provide one.
pub const DEFAULT_BIO: &str = "Nuevo miembro de la comunidad VeciNet";

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,

    /// Stored lowercased and trimmed; unique.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password_hash: String,

    pub name: String,
    pub bio: String,
    pub avatar_url: Option<String>,

    /// Reputation rating, 5.0 for new accounts.
    pub rating: f64,

    /// Live listing count, maintained by post create/delete.
    pub total_posts: i64,
    pub completed_exchanges: i64,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Public view of a user, safe to return for any profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub rating: f64,
    pub total_posts: i64,
    pub completed_exchanges: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 2,
        max = 80,
        message = "Name length must be between 2 and 80 characters"
    ))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(
        min = 8,
        max = 128,
        message = "Password length must be between 8 and 128 characters"
    ))]
    pub password: String,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for profile updates; only supplied fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(
        min = 2,
        max = 80,
        message = "Name length must be between 2 and 80 characters"
    ))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    pub avatar_url: Option<String>,
}
