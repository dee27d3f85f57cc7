// src/handlers/posts.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json as SqlJson;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    feed::{self, FeedQuery},
    models::{
        post::{CreatePostRequest, FeedParams, Post, UpdatePostRequest},
        report::REPORT_THRESHOLD,
    },
    utils::{html::clean_html, jwt::Claims},
};

const POST_COLUMNS: &str = r#"
    id, user_id, category, title, description, images, lat, lng,
    postal_code, responses_count, reports_count, is_expired,
    created_at, updated_at, expires_at
"#;

/// Create a new post.
///
/// Stamps a 30-day expiration and increments the owner's listing counter in
/// the same transaction.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user_id = claims.user_id();
    let now = Utc::now();
    let expires_at = Post::expiry_from(now);
    let description = clean_html(&payload.description);

    let mut tx = pool.begin().await?;

    sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        INSERT INTO posts (user_id, category, title, description, images, lat, lng,
                           postal_code, created_at, updated_at, expires_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(payload.category)
    .bind(payload.title.trim())
    .bind(&description)
    .bind(SqlJson(&payload.images))
    .bind(payload.coordinates.lat)
    .bind(payload.coordinates.lng)
    .bind(&payload.postal_code)
    .bind(now)
    .bind(now)
    .bind(expires_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        AppError::from(e)
    })?;

    sqlx::query("UPDATE users SET total_posts = total_posts + 1 WHERE id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// The feed: active posts filtered by search text, category and distance,
/// ordered nearest first.
///
/// SQL prefilters the cheap invariants; the engine in `crate::feed` re-checks
/// everything against the clock, so a post past its expiration never surfaces
/// even before the sweep has flipped its flag.
pub async fn list_feed(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Query(params): Query<FeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = params.viewer()?;
    let radius_km = params
        .radius_km
        .unwrap_or(config.default_radius_km)
        .min(config.max_radius_km);

    let candidates = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE reports_count < ? AND is_expired = 0
        ORDER BY created_at DESC, id DESC
        "#
    ))
    .bind(REPORT_THRESHOLD)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list posts: {:?}", e);
        AppError::from(e)
    })?;

    let query = FeedQuery {
        search: params.search,
        category: params.category,
        viewer,
        radius_km,
    };

    Ok(Json(feed::build_feed(candidates, &query, Utc::now())))
}

/// Get a single post by ID.
pub async fn get_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Update a post's content fields. Owner only; applies only supplied fields
/// and stamps `updated_at`.
pub async fn update_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let current = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Post not found".to_string()))?;

    if current.user_id != claims.user_id() {
        return Err(AppError::Auth(
            "You are not authorized to edit this post".to_string(),
        ));
    }

    let category = payload.category.unwrap_or(current.category);
    let title = payload.title.unwrap_or(current.title);
    let description = payload
        .description
        .map(|description| clean_html(&description))
        .unwrap_or(current.description);
    let images = payload.images.map(SqlJson).unwrap_or(current.images);

    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET category = ?, title = ?, description = ?, images = ?, updated_at = ?
        WHERE id = ?
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(category)
    .bind(title.trim())
    .bind(&description)
    .bind(images)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(post))
}

/// Delete a post. Owner only; hard removal, and the owner's listing counter
/// is decremented in the same transaction.
pub async fn delete_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = pool.begin().await?;

    let (owner_id,) = sqlx::query_as::<_, (i64,)>("SELECT user_id FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    if owner_id != claims.user_id() {
        return Err(AppError::Auth(
            "You are not authorized to delete this post".to_string(),
        ));
    }

    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE users SET total_posts = MAX(total_posts - 1, 0) WHERE id = ?")
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Extend a post for another 30 days. Owner only; also clears the expired
/// flag, regardless of prior state.
pub async fn extend_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (owner_id,) = sqlx::query_as::<_, (i64,)>("SELECT user_id FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    if owner_id != claims.user_id() {
        return Err(AppError::Auth(
            "You are not authorized to extend this post".to_string(),
        ));
    }

    let now = Utc::now();
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET expires_at = ?, is_expired = 0, updated_at = ?
        WHERE id = ?
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(Post::expiry_from(now))
    .bind(now)
    .bind(id)
    .fetch_one(&pool)
    .await?;

    tracing::info!(post_id = id, "Post extended for another 30 days");

    Ok(Json(post))
}

/// The caller's posts inside the expiring window, most urgent first.
pub async fn list_expiring(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE user_id = ? AND is_expired = 0
        "#
    ))
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    let now = Utc::now();
    let mut expiring: Vec<Post> = posts
        .into_iter()
        .filter(|post| post.is_expiring_soon(now))
        .collect();
    expiring.sort_by_key(|post| post.expires_at);

    Ok(Json(expiring))
}
