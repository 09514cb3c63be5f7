//! Bearer token extraction.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_auth::AuthBearer;

use crate::domain::identity::Caller;

/// Extracts the caller's credentials from the `Authorization` header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// Authentication is optional on every endpoint: a missing or malformed
/// header yields [`Caller::Anonymous`] and never rejects the request.
/// Whether the token is valid is decided later by the identity resolver.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(caller: Caller) -> String {
///     format!("{caller:?}")
/// }
/// ```
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match AuthBearer::from_request_parts(parts, &()).await {
            Ok(AuthBearer(token)) if !token.trim().is_empty() => Ok(Caller::Bearer(token)),
            _ => Ok(Caller::Anonymous),
        }
    }
}
