//! Identity service configuration.

use serde::{Deserialize, Serialize};

/// Settings for the platform identity service used to resolve the
/// calling principal from an API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the identity service.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://workbench-frontend.workbench-platform:80".to_string()
}

fn default_timeout() -> u64 {
    10
}
