// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{DEFAULT_BIO, LoginRequest, RegisterRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it. The email is stored
/// lowercased and trimmed; a duplicate registers as 409 Conflict.
/// Returns 201 Created with a token and the user object (excluding the hash).
pub async fn register(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();
    let bio = payload
        .bio
        .filter(|bio| !bio.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIO.to_string());
    let password_hash = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, name, bio, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, email, password_hash, name, bio, avatar_url, rating,
                  total_posts, completed_exchanges, created_at
        "#,
    )
    .bind(&email)
    .bind(&password_hash)
    .bind(payload.name.trim())
    .bind(&bio)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            AppError::Conflict("This email is already registered".to_string())
        } else {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "type": "Bearer",
            "user": user
        })),
    ))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, name, bio, avatar_url, rating,
               total_posts, completed_exchanges, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(&email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::Internal(e.to_string())
    })?
    .ok_or(AppError::Auth("Invalid email or password".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password_hash)?;

    if !is_valid {
        return Err(AppError::Auth("Invalid email or password".to_string()));
    }

    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": user
    })))
}
