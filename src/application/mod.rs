//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::short_link_service::ShortLinkService`] - Short link creation, listing and resolution
//! - [`services::key_issuer::UniqueKeyIssuer`] - Collision-avoiding short key issuance
//! - [`services::identity_service::TokenIdentityResolver`] - API token identity lookup

pub mod services;
