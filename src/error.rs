//! Application error type shared by every layer.
//!
//! Each variant maps to one HTTP status code and a stable machine-readable
//! `code` string rendered in the JSON error body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Name of the unique constraint guarding `short_links.short_key`.
pub const SHORT_KEY_CONSTRAINT: &str = "short_links_short_key_key";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or blank.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// The target URL is malformed or its host is unacceptable.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// The requested listing page lies past the last page.
    #[error("Invalid page number. Max valid page number is {max_page}")]
    PageOutOfRange { max_page: u64 },

    /// No free short key was found within the retry budget.
    #[error("Failed to generate unique short key after {attempts} attempts")]
    KeyExhausted { attempts: u32 },

    /// Another writer inserted the same short key first.
    #[error("Short key '{key}' is already taken")]
    KeyConflict { key: String },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The link exists but its expiry time has passed.
    #[error("{message}")]
    Gone { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. }
            | AppError::InvalidUrl { .. }
            | AppError::PageOutOfRange { .. } => StatusCode::BAD_REQUEST,
            AppError::KeyConflict { .. } | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::KeyExhausted { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into its client-facing payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, details) = match self {
            AppError::InvalidInput { details, .. } => ("invalid_input", details.clone()),
            AppError::InvalidUrl { details, .. } => ("invalid_url", details.clone()),
            AppError::PageOutOfRange { max_page } => {
                ("page_out_of_range", json!({ "max_page": max_page }))
            }
            AppError::KeyExhausted { attempts } => {
                ("key_exhausted", json!({ "attempts": attempts }))
            }
            AppError::KeyConflict { key } => ("key_conflict", json!({ "key": key })),
            AppError::Conflict { details, .. } => ("conflict", details.clone()),
            AppError::NotFound { details, .. } => ("not_found", details.clone()),
            AppError::Gone { details, .. } => ("gone", details.clone()),
            AppError::Unauthorized { details, .. } => ("unauthorized", details.clone()),
            AppError::Internal { details, .. } => ("internal_error", details.clone()),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            if db.constraint() == Some(SHORT_KEY_CONSTRAINT) {
                return AppError::KeyConflict {
                    key: String::new(),
                };
            }
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages: Vec<String> = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), json!(messages))
            })
            .collect();

        AppError::invalid_input("Validation failed", json!({ "errors": fields }))
    }
}
