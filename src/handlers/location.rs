// src/handlers/location.rs

use axum::{Json, extract::Path, response::IntoResponse};

use crate::{error::AppError, models::location::lookup_postal_code};

/// Resolve a postal code to its approximate coordinate and area label, for
/// clients using the postal-code location method.
pub async fn postal_lookup(Path(code): Path<String>) -> Result<impl IntoResponse, AppError> {
    let area = lookup_postal_code(&code)
        .ok_or_else(|| AppError::NotFound(format!("Unknown postal code '{code}'")))?;

    Ok(Json(area))
}
