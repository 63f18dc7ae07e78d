//! Maps domain `AppError` to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use autostop_core::error::{AppError, ErrorKind};

/// Newtype carrying an [`AppError`] across the Axum boundary.
///
/// Rejections and dependency failures are returned as plain-text bodies:
/// the reason for a 403, the underlying error text for a 500.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::ExternalService
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                tracing::error!(error = %self.0, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.0.message).into_response()
    }
}
