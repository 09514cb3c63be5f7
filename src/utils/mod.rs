//! Helper functions shared by the service layer.
//!
//! - [`key_generator`] - Random short key generation
//! - [`url_normalizer`] - Target URL normalization and syntactic validation

pub mod key_generator;
pub mod url_normalizer;
