//! `ApiKey` extractor — pulls the opaque credential from the request headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use autostop_auth::API_KEY_HEADER;
use autostop_core::error::AppError;

use crate::error::ApiError;

/// The caller's opaque API credential.
///
/// The credential is never interpreted here; the authorization gate
/// forwards it to the identity service as-is.
#[derive(Debug, Clone)]
pub struct ApiKey(pub String);

impl<S> FromRequestParts<S> for ApiKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|key| ApiKey(key.to_string()))
            .ok_or_else(|| {
                ApiError(AppError::authentication(format!(
                    "Missing {API_KEY_HEADER} header"
                )))
            })
    }
}
