//! API route configuration.
//!
//! Authentication is optional: handlers that care about the caller take a
//! [`crate::domain::identity::Caller`] extractor.

use crate::api::handlers::{create_short_link_handler, list_short_links_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All routes nested under `/api`.
///
/// # Endpoints
///
/// - `GET  /short-urls` - List public short links (paginated)
/// - `POST /short-urls` - Create a short link
pub fn api_routes() -> Router<AppState> {
    Router::new().route(
        "/short-urls",
        get(list_short_links_handler).post(create_short_link_handler),
    )
}
