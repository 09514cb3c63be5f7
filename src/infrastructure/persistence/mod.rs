//! Repository implementations.
//!
//! PostgreSQL implementations use SQLx runtime queries mapped through
//! `FromRow` rows. In-memory implementations back single-process runs and
//! the HTTP integration tests.
//!
//! # Repositories
//!
//! - [`PgShortLinkRepository`] - Short link storage and public listing
//! - [`PgTokenRepository`] - Owners and API tokens
//! - [`InMemoryShortLinkRepository`] / [`InMemoryTokenRepository`] - Process-local stores

pub mod memory;
pub mod pg_short_link_repository;
pub mod pg_token_repository;

pub use memory::{InMemoryShortLinkRepository, InMemoryTokenRepository};
pub use pg_short_link_repository::PgShortLinkRepository;
pub use pg_token_repository::PgTokenRepository;
