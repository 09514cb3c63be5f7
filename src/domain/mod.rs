//! Domain layer containing business entities and contracts.
//!
//! Nothing in here depends on HTTP or on a concrete database. Repository and
//! identity traits are implemented by [`crate::infrastructure`] and consumed by
//! [`crate::application::services`].
//!
//! # Architecture
//!
//! - [`entities`] - Short links and their owners
//! - [`repositories`] - Data access trait definitions
//! - [`pagination`] - 1-based page requests and page metadata
//! - [`identity`] - Caller credentials and owner resolution

pub mod entities;
pub mod identity;
pub mod pagination;
pub mod repositories;
