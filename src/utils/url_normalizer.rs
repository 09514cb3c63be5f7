//! Target URL normalization and validation.
//!
//! Normalization is deliberately minimal: surrounding whitespace is trimmed
//! and a missing `http://` / `https://` scheme is filled in. Host and path are
//! never rewritten. Validation is purely syntactic and never touches the
//! network.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Errors produced while normalizing or validating a target URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Target URL cannot be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    Unparseable(String),

    #[error("Invalid URL: missing host")]
    MissingHost,

    #[error("Invalid URL: host '{0}' must contain a dot")]
    HostWithoutDot(String),

    #[error("Invalid URL: host '{0}' cannot start or end with a dot")]
    HostEdgeDot(String),
}

impl From<UrlError> for AppError {
    fn from(e: UrlError) -> Self {
        match e {
            UrlError::Empty => AppError::invalid_input(e.to_string(), json!({ "field": "targetUrl" })),
            _ => AppError::invalid_url(e.to_string(), json!({ "reason": reason_code(&e) })),
        }
    }
}

fn reason_code(e: &UrlError) -> &'static str {
    match e {
        UrlError::Empty => "empty",
        UrlError::Unparseable(_) => "unparseable",
        UrlError::MissingHost => "missing_host",
        UrlError::HostWithoutDot(_) => "host_without_dot",
        UrlError::HostEdgeDot(_) => "host_edge_dot",
    }
}

/// Trims the input and prefixes `http://` when no HTTP scheme is present.
///
/// # Errors
///
/// Returns [`UrlError::Empty`] if the input is empty or only whitespace.
///
/// # Examples
///
/// ```
/// use shortlinks::utils::url_normalizer::normalize_url;
///
/// assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
/// assert_eq!(normalize_url(" https://a.b/x ").unwrap(), "https://a.b/x");
/// ```
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("http://{trimmed}"))
    }
}

/// Checks that a URL parses and carries a plausible dotted host.
///
/// # Rules
///
/// 1. The string must parse as an absolute URL
/// 2. The host must be present and non-blank
/// 3. The host must contain at least one `.`
/// 4. The host cannot start or end with `.`
///
/// # Errors
///
/// Returns the first rule violated, in the order above.
pub fn validate_url(input: &str) -> Result<(), UrlError> {
    let url = Url::parse(input).map_err(|e| UrlError::Unparseable(e.to_string()))?;

    let host = match url.host_str() {
        Some(host) if !host.trim().is_empty() => host,
        _ => return Err(UrlError::MissingHost),
    };

    if !host.contains('.') {
        return Err(UrlError::HostWithoutDot(host.to_string()));
    }

    if host.starts_with('.') || host.ends_with('.') {
        return Err(UrlError::HostEdgeDot(host.to_string()));
    }

    Ok(())
}

/// Normalizes and validates in one step, returning the stored form.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] for blank input and
/// [`AppError::InvalidUrl`] for any validation failure.
pub fn prepare_target_url(raw: &str) -> Result<String, AppError> {
    let normalized = normalize_url(raw)?;
    validate_url(&normalized)?;
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_http_scheme() {
        assert_eq!(normalize_url("example.com").unwrap(), "http://example.com");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_url(" https://a.b/x ").unwrap(), "https://a.b/x");
        assert_eq!(normalize_url("\t\nexample.com/path\n").unwrap(), "http://example.com/path");
    }

    #[test]
    fn test_normalize_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.com").unwrap(), "http://example.com");
        assert_eq!(normalize_url("https://example.com").unwrap(), "https://example.com");
    }

    #[test]
    fn test_normalize_preserves_host_case_and_path() {
        assert_eq!(
            normalize_url("https://EXAMPLE.com/Some/Path?q=1#frag").unwrap(),
            "https://EXAMPLE.com/Some/Path?q=1#frag"
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_url(""), Err(UrlError::Empty));
        assert_eq!(normalize_url("   "), Err(UrlError::Empty));
    }

    #[test]
    fn test_validate_accepts_dotted_hosts() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://sub.example.co.uk/path?x=1").is_ok());
        assert!(validate_url("http://192.168.1.1:8080/api").is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        assert!(validate_url("http://").is_err());
    }

    #[test]
    fn test_validate_leading_dot_host() {
        assert!(validate_url("http://.com").is_err());
    }

    #[test]
    fn test_validate_trailing_dot_host() {
        assert!(validate_url("http://a.").is_err());
    }

    #[test]
    fn test_validate_host_without_dot() {
        assert_eq!(
            validate_url("http://localhost:3000/test"),
            Err(UrlError::HostWithoutDot("localhost".to_string()))
        );
        assert!(validate_url("https://intranet").is_err());
    }

    #[test]
    fn test_validate_unparseable() {
        assert!(matches!(
            validate_url("not a url"),
            Err(UrlError::Unparseable(_))
        ));
        assert!(matches!(
            validate_url("http://exa mple.com"),
            Err(UrlError::Unparseable(_))
        ));
    }

    #[test]
    fn test_normalize_then_validate_round() {
        for raw in [
            "example.com",
            "https://example.com/a/b?c=d",
            "  www.rust-lang.org/learn  ",
            "http://api.example.com:8443/v1",
        ] {
            let normalized = normalize_url(raw).unwrap();
            assert!(validate_url(&normalized).is_ok(), "{normalized} should be valid");
            assert!(normalized.ends_with(raw.trim().trim_start_matches("https://")));
        }
    }

    #[test]
    fn test_prepare_target_url_error_kinds() {
        assert!(matches!(
            prepare_target_url("  "),
            Err(AppError::InvalidInput { .. })
        ));
        assert!(matches!(
            prepare_target_url("localhost"),
            Err(AppError::InvalidUrl { .. })
        ));
        assert_eq!(prepare_target_url("foo.com").unwrap(), "http://foo.com");
    }
}
