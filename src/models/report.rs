// src/models/report.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Distinct reporters required to remove a post automatically.
pub const REPORT_THRESHOLD: i64 = 3;

/// Represents the 'reports' table in the database.
/// One row per (post, reporter) pair, enforced by a unique constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: i64,
    pub post_id: i64,
    pub reporter_id: i64,
    pub reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for submitting a report.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// Outcome of a report submission. A duplicate report is a benign outcome,
/// not an error.
#[derive(Debug, Serialize)]
pub struct ReportOutcome {
    pub already_reported: bool,
}
