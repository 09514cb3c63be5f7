//! Caller credentials and owner resolution.

use async_trait::async_trait;

use crate::domain::entities::Owner;

/// Credentials presented by the caller of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Bearer(String),
}

impl Caller {
    pub fn bearer(token: impl Into<String>) -> Self {
        Caller::Bearer(token.into())
    }
}

/// Reasons a caller could not be resolved to an owner.
///
/// None of these are surfaced to clients: link creation falls back to an
/// anonymous link.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("caller is anonymous")]
    Anonymous,

    #[error("token is unknown or revoked")]
    InvalidToken,

    #[error("identity backend failed: {0}")]
    Backend(String),
}

/// Resolves caller credentials to the owning user.
///
/// # Implementations
///
/// - [`crate::application::services::TokenIdentityResolver`] - API token lookup
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, caller: &Caller) -> Result<Owner, IdentityError>;
}
