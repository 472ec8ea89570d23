//! Application error type and its HTTP mapping.
//!
//! Every fallible path in the crate funnels into [`AppError`]. The HTTP
//! layer renders it as `{"error": "<message>"}` with a status code per
//! variant; callers never build error bodies by hand.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Creation input rejected: target URL missing or not http(s).
    #[error("Invalid URL")]
    InvalidUrl,

    /// Creation input rejected: caller-supplied code fails the format rule.
    #[error("Invalid custom code")]
    InvalidCodeFormat,

    /// Caller-supplied code is already taken.
    #[error("code '{code}' already exists")]
    CodeConflict { code: String },

    /// Random generation kept colliding until the attempt budget ran out.
    #[error("code generation exhausted after maximum attempts")]
    CodeGenerationExhausted,

    /// No record for the requested code.
    #[error("link not found")]
    NotFound,

    /// Deletion secret did not match the stored one.
    #[error("secret mismatch")]
    Forbidden,

    /// Deletion request carried no secret.
    #[error("secret required")]
    MissingSecret,

    /// Storage-level insert collision. The service layer translates this
    /// into [`AppError::CodeConflict`] or a retry; it maps to 409 in case
    /// it ever escapes untranslated.
    #[error("duplicate code '{code}' in store")]
    DuplicateCode { code: String },

    /// Backend unreachable, uninitialized, or corrupted.
    #[error("storage backend unavailable: {reason}")]
    BackendUnavailable { reason: String },
}

impl AppError {
    pub fn backend(reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            reason: reason.into(),
        }
    }

    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl | AppError::InvalidCodeFormat | AppError::MissingSecret => {
                StatusCode::BAD_REQUEST
            }
            AppError::CodeConflict { .. } | AppError::DuplicateCode { .. } => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::CodeGenerationExhausted | AppError::BackendUnavailable { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message, stable across releases. Internal detail
    /// (the offending code, the IO reason) stays in logs only.
    fn client_message(&self) -> &'static str {
        match self {
            AppError::InvalidUrl => "Invalid URL",
            AppError::InvalidCodeFormat => "Invalid custom code",
            AppError::CodeConflict { .. } | AppError::DuplicateCode { .. } => "Code already exists",
            AppError::CodeGenerationExhausted => "Failed to generate code",
            AppError::NotFound => "Not found",
            AppError::Forbidden => "Forbidden",
            AppError::MissingSecret => "Secret required",
            AppError::BackendUnavailable { .. } => "Internal error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::BackendUnavailable { ref reason } = self {
            tracing::error!(reason, "storage backend failure");
        }

        let status = self.status();
        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

/// Translates a sqlx error surfaced by an insert into the store-level
/// contract: unique-key violation means the code is taken, anything else
/// means the backend is unhealthy.
pub fn map_insert_error(code: &str, e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return AppError::DuplicateCode {
                code: code.to_owned(),
            };
        }
    }
    AppError::backend(e.to_string())
}

/// Translates any other sqlx error into [`AppError::BackendUnavailable`].
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    AppError::backend(e.to_string())
}
