// src/sweep.rs
//
// Background expiration sweep. Flips the stored `is_expired` flag on posts
// whose expiration has passed. The flag is an optimization and audit trail:
// the feed excludes timed-out posts on its own, so nothing depends on this
// running at any particular moment.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::time::Duration;

use crate::error::AppError;

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run a single sweep cycle. Returns how many posts were flipped.
pub async fn sweep_expired(pool: &SqlitePool) -> Result<u64, AppError> {
    let now = Utc::now();

    let candidates =
        sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            "SELECT id, expires_at FROM posts WHERE is_expired = 0",
        )
        .fetch_all(pool)
        .await?;

    let mut flipped = 0;
    for (id, expires_at) in candidates {
        if expires_at <= now {
            sqlx::query("UPDATE posts SET is_expired = 1 WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await?;
            flipped += 1;
        }
    }

    Ok(flipped)
}

/// Run the sweep worker: once immediately, then at the configured interval.
pub async fn run_sweep_worker(pool: SqlitePool) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Starting expiration sweep worker"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        interval.tick().await;
        match sweep_expired(&pool).await {
            Ok(flipped) if flipped > 0 => {
                tracing::info!(expired_posts = flipped, "Marked posts as expired");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Expiration sweep failed: {e}");
            }
        }
    }
}
