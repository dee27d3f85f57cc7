// src/handlers/reports.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::report::{REPORT_THRESHOLD, ReportOutcome, ReportRequest},
    utils::{html::clean_html, jwt::Claims},
};

/// Report a post as inappropriate.
///
/// At most one report per (post, reporter) pair; a duplicate submission is a
/// benign `already_reported` outcome, deduplicated by the unique constraint
/// on the reports table rather than a check-then-insert. The increment and
/// the threshold check run inside one transaction, so the post can never be
/// observed with three reports and still be present, and the removal fires
/// exactly once. Reporting one's own post is rejected.
pub async fn report_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    Json(payload): Json<ReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let reporter_id = claims.user_id();
    let reason = payload.reason.as_deref().map(clean_html);

    let mut tx = pool.begin().await?;

    let (owner_id,) = sqlx::query_as::<_, (i64,)>("SELECT user_id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    if owner_id == reporter_id {
        return Err(AppError::Validation(
            "You cannot report your own post".to_string(),
        ));
    }

    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO reports (post_id, reporter_id, reason, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(post_id)
    .bind(reporter_id)
    .bind(&reason)
    .bind(chrono::Utc::now())
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(Json(ReportOutcome {
            already_reported: true,
        }));
    }

    let (reports_count,) = sqlx::query_as::<_, (i64,)>(
        "UPDATE posts SET reports_count = reports_count + 1 WHERE id = ? RETURNING reports_count",
    )
    .bind(post_id)
    .fetch_one(&mut *tx)
    .await?;

    if reports_count >= REPORT_THRESHOLD {
        // Irreversible: the post and its reports (cascade) are gone for good.
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET total_posts = MAX(total_posts - 1, 0) WHERE id = ?")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tracing::info!(post_id, reports_count, "Post removed after report threshold");
    }

    tx.commit().await?;

    Ok(Json(ReportOutcome {
        already_reported: false,
    }))
}
