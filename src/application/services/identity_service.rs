//! API token based identity resolution.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::Owner;
use crate::domain::identity::{Caller, IdentityError, IdentityResolver};
use crate::domain::repositories::TokenRepository;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function when it stores new tokens.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves Bearer tokens to their owners.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before the
/// lookup, so the store never sees raw tokens.
pub struct TokenIdentityResolver<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> TokenIdentityResolver<R> {
    /// Creates a resolver.
    ///
    /// `signing_secret` must match the value used when the tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }
}

#[async_trait]
impl<R: TokenRepository + ?Sized> IdentityResolver for TokenIdentityResolver<R> {
    async fn resolve(&self, caller: &Caller) -> Result<Owner, IdentityError> {
        let Caller::Bearer(token) = caller else {
            return Err(IdentityError::Anonymous);
        };

        let token_hash = hash_token(&self.signing_secret, token);

        let owner = self
            .repository
            .find_owner_by_token_hash(&token_hash)
            .await
            .map_err(|e| IdentityError::Backend(e.to_string()))?
            .ok_or(IdentityError::InvalidToken)?;

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            warn!(error = %e, "Failed to record token usage");
        }

        Ok(owner)
    }
}
