//! Unified error handling with Sentry integration.
//!
//! Handler-facing error type for the admin panel. Validation and store
//! failures that the operator can act on are turned into flash messages
//! by the handlers themselves; `AdminError` covers the plumbing failures
//! that abort the request.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Catalog store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Reading the multipart form body failed.
    #[error("Upload error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store(_) | Self::Session(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Multipart(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(StoreError::NotFound) => "Produto não encontrado".to_string(),
            Self::Store(_) => "Erro ao falar com o catálogo".to_string(),
            Self::Session(_) | Self::Internal(_) => "Erro interno".to_string(),
            Self::Multipart(_) => "Erro ao ler o formulário".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        fn get_status(err: AdminError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AdminError::Store(StoreError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AdminError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
