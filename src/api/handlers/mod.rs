//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod short_links;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use short_links::{create_short_link_handler, list_short_links_handler};
