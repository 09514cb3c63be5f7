//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for persisted short links.
///
/// Implementations must enforce uniqueness of `key` at insert time and report
/// a lost race as [`AppError::KeyConflict`], so that callers can retry with a
/// fresh key.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryShortLinkRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::KeyConflict`] if the key is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_key(&self, key: &str) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if a link with this key exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists_by_key(&self, key: &str) -> Result<bool, AppError>;

    /// Lists public links, newest first, together with the total number of
    /// public links.
    ///
    /// # Arguments
    ///
    /// - `offset` - Number of rows to skip
    /// - `limit` - Maximum number of rows to return
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_public(&self, offset: u64, limit: u64)
    -> Result<(Vec<ShortLink>, u64), AppError>;

    /// Atomically increments the click counter and returns the updated link.
    ///
    /// Returns `Ok(None)` if no link has this key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_click_count(&self, key: &str) -> Result<Option<ShortLink>, AppError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot serve requests.
    async fn ping(&self) -> Result<(), AppError>;
}
