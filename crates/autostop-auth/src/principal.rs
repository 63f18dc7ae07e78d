//! Identity-service principal lookup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use autostop_core::config::identity::IdentityConfig;
use autostop_core::error::{AppError, ErrorKind};
use autostop_core::result::AppResult;

/// Header carrying the caller's opaque API credential.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Relative path of the who-am-I endpoint on the identity service.
const PRINCIPAL_ENDPOINT: &str = "v4/auth/principal";

/// The caller identity resolved from an API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Canonical login name.
    pub canonical_name: String,
    /// Whether the caller is a platform admin.
    pub is_admin: bool,
}

/// HTTP client for the identity service.
#[derive(Debug, Clone)]
pub struct PrincipalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PrincipalClient {
    /// Build a client from identity-service configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Failed to build identity service client",
                    e,
                )
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the principal behind an API key.
    ///
    /// Any non-success status from the identity service is fatal to the
    /// calling operation; the gate never guesses on a degraded authority.
    pub async fn whoami(&self, api_key: &str) -> AppResult<Principal> {
        let url = format!("{}/{}", self.base_url, PRINCIPAL_ENDPOINT);

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Identity service unreachable: {e}"),
                    e,
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "{} - Error getting caller principal",
                status.as_u16()
            )));
        }

        response.json::<Principal>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Invalid principal response from identity service",
                e,
            )
        })
    }
}
