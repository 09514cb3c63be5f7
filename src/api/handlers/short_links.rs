//! Handlers for the short link collection.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::pagination::{PageQuery, PagedResult};
use crate::api::dto::short_link::{CreateShortLinkRequest, ShortLinkResponse};
use crate::domain::identity::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Lists public short links, newest first.
///
/// # Endpoint
///
/// `GET /api/short-urls?page=N`
///
/// `page` is 1-based and defaults to 1; zero and negative values are treated
/// as 1. Each page holds 10 links.
///
/// # Response
///
/// ```json
/// {
///   "data": [
///     {
///       "id": 21,
///       "key": "aB3xY9",
///       "targetUrl": "https://example.com",
///       "isPrivate": false,
///       "owner": null,
///       "clickCount": 0,
///       "createdAt": "2026-01-01T00:00:00Z",
///       "expiresAt": null
///     }
///   ],
///   "pageNumber": 1,
///   "totalPages": 3,
///   "totalElements": 21,
///   "isFirst": true,
///   "isLast": false,
///   "hasNext": true,
///   "hasPrevious": false
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with code `page_out_of_range` if the page lies
/// past the last page.
pub async fn list_short_links_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PagedResult<ShortLinkResponse>>, AppError> {
    let page = state
        .short_link_service
        .list_public_short_links(query.page_number())
        .await?;

    Ok(Json(page.into()))
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/short-urls`
///
/// # Request Body
///
/// ```json
/// {
///   "targetUrl": "example.com",
///   "isPrivate": false,
///   "expirationInDays": 7
/// }
/// ```
///
/// A valid `Authorization: Bearer <token>` header records the token's owner
/// on the link; without one (or with an unknown token) the link is anonymous.
///
/// # Errors
///
/// Returns 400 Bad Request for a blank or invalid URL.
/// Returns 500 Internal Server Error if no free key could be found.
pub async fn create_short_link_handler(
    State(state): State<AppState>,
    caller: Caller,
    Json(payload): Json<CreateShortLinkRequest>,
) -> Result<(StatusCode, Json<ShortLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .short_link_service
        .create_short_link(payload.into(), &caller)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}
