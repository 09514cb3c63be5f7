//! Core domain entities.
//!
//! - [`ShortLink`] - A persisted short key to target URL mapping
//! - [`NewShortLink`] - Input for creating a short link
//! - [`Owner`] - The user identity a link may belong to

pub mod owner;
pub mod short_link;

pub use owner::Owner;
pub use short_link::{NewShortLink, ShortLink};
