//! Business logic services for the application layer.

pub mod identity_service;
pub mod key_issuer;
pub mod short_link_service;

pub use identity_service::{TokenIdentityResolver, hash_token};
pub use key_issuer::UniqueKeyIssuer;
pub use short_link_service::{CreateShortLink, PUBLIC_PAGE_SIZE, ShortLinkService};
