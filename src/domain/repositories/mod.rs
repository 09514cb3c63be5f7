//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ShortLinkRepository`] - Short link storage, lookup and public listing
//! - [`TokenRepository`] - Owners and API tokens

pub mod short_link_repository;
pub mod token_repository;

pub use short_link_repository::ShortLinkRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
