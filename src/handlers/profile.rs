// src/handlers/profile.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use url::Url;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        post::Post,
        user::{PublicUser, UpdateProfileRequest, User},
    },
    utils::jwt::Claims,
};

/// Get the current user's own profile (includes email).
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, bio, avatar_url, rating,
               total_posts, completed_exchanges, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(claims.user_id())
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update the current user's profile. Only supplied fields are applied.
pub async fn update_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if let Some(avatar_url) = payload.avatar_url.as_deref() {
        Url::parse(avatar_url)
            .map_err(|_| AppError::Validation("avatar_url is not a valid URL".to_string()))?;
    }

    let user_id = claims.user_id();

    let current = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, bio, avatar_url, rating,
               total_posts, completed_exchanges, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let name = payload.name.unwrap_or(current.name);
    let bio = payload.bio.unwrap_or(current.bio);
    let avatar_url = payload.avatar_url.or(current.avatar_url);

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = ?, bio = ?, avatar_url = ?
        WHERE id = ?
        RETURNING id, email, password_hash, name, bio, avatar_url, rating,
                  total_posts, completed_exchanges, created_at
        "#,
    )
    .bind(name.trim())
    .bind(&bio)
    .bind(&avatar_url)
    .bind(user_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(user))
}

/// Get a user's public profile (no email).
pub async fn get_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = sqlx::query_as::<_, PublicUser>(
        r#"
        SELECT id, name, bio, avatar_url, rating,
               total_posts, completed_exchanges, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// List a user's active listings, newest first. Expiration is checked
/// against the clock, not just the stored flag.
pub async fn list_user_posts(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, category, title, description, images, lat, lng,
               postal_code, responses_count, reports_count, is_expired,
               created_at, updated_at, expires_at
        FROM posts
        WHERE user_id = ? AND is_expired = 0
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let now = chrono::Utc::now();
    let posts: Vec<Post> = posts
        .into_iter()
        .filter(|post| !post.is_past_expiry(now))
        .collect();

    Ok(Json(posts))
}
