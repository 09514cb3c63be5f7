//! Handler for short key redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its target URL.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// Every successful resolution increments the link's click count. Private
/// links resolve like public ones; privacy only hides them from listings.
///
/// # Errors
///
/// Returns 404 Not Found if the key is unknown.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let link = state.short_link_service.resolve_short_link(&key).await?;

    debug!(key = %link.key, clicks = link.click_count, "Redirecting");

    Ok(Redirect::temporary(&link.target_url))
}
