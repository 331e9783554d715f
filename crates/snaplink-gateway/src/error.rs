use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snaplink_analytics::AnalyticsError;
use snaplink_core::{RegistryError, StorageError};
use thiserror::Error;
use tracing::{error, warn};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    /// The request could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, bool) {
        match self {
            AppError::Registry(err) => registry_parts(err),
            AppError::Analytics(AnalyticsError::Storage(err)) => storage_parts(err),
            AppError::Analytics(AnalyticsError::StoreTimeout) => {
                (StatusCode::GATEWAY_TIMEOUT, "store_timeout", true)
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", false),
        }
    }
}

fn registry_parts(err: &RegistryError) -> (StatusCode, &'static str, bool) {
    let retriable = err.is_retriable();
    let (status, code) = match err {
        RegistryError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "invalid_url"),
        RegistryError::InvalidSlugFormat(_) => (StatusCode::BAD_REQUEST, "invalid_slug_format"),
        RegistryError::SlugTaken(_) => (StatusCode::CONFLICT, "slug_taken"),
        RegistryError::SlugGenerationExhausted { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "slug_generation_exhausted")
        }
        RegistryError::UnknownSlug(_) => (StatusCode::NOT_FOUND, "unknown_slug"),
        RegistryError::CreateOutcomeUnknown { .. } => {
            (StatusCode::GATEWAY_TIMEOUT, "create_outcome_unknown")
        }
        RegistryError::StoreTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "store_timeout"),
        RegistryError::Storage(err) => return storage_parts(err),
    };
    (status, code, retriable)
}

fn storage_parts(err: &StorageError) -> (StatusCode, &'static str, bool) {
    match err {
        StorageError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", true),
        StorageError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "store_timeout", true),
        StorageError::Query(_) | StorageError::InvalidData(_) | StorageError::Operation(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal", false)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, retriable) = self.parts();

        // Store internals stay in the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "internal storage error".to_string()
        } else {
            if status.is_server_error() {
                warn!(error = %self, code, "request failed");
            }
            self.to_string()
        };

        let body = ErrorResponse {
            error: code,
            message,
            retriable,
        };
        (status, Json(body)).into_response()
    }
}
