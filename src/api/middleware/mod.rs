//! HTTP middleware and extractors for request processing.
//!
//! Provides bearer credential extraction and request tracing.

pub mod auth;
pub mod tracing;
