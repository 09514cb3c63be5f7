//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ShortLinkService, TokenIdentityResolver, UniqueKeyIssuer};
use crate::domain::identity::IdentityResolver;
use crate::domain::repositories::{ShortLinkRepository, TokenRepository};
use crate::utils::key_generator::KeyGenerator;

/// Short link service over type-erased collaborators, as held by the router.
pub type DynShortLinkService = ShortLinkService<dyn ShortLinkRepository, dyn IdentityResolver>;

#[derive(Clone)]
pub struct AppState {
    pub short_link_service: Arc<DynShortLinkService>,
}

impl AppState {
    pub fn new(short_link_service: Arc<DynShortLinkService>) -> Self {
        Self { short_link_service }
    }

    /// Wires the services on top of the given stores.
    ///
    /// Keys are drawn from an OS-seeded generator; `key_max_attempts` bounds
    /// both collision retries and insert-conflict retries.
    pub fn from_repositories(
        links: Arc<dyn ShortLinkRepository>,
        tokens: Arc<dyn TokenRepository>,
        token_signing_secret: String,
        key_max_attempts: u32,
    ) -> Self {
        let identity: Arc<dyn IdentityResolver> =
            Arc::new(TokenIdentityResolver::new(tokens, token_signing_secret));
        let issuer = UniqueKeyIssuer::new(KeyGenerator::new(), key_max_attempts);

        Self::new(Arc::new(ShortLinkService::new(links, identity, issuer)))
    }
}
