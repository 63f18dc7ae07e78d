//! Authorization configuration.

use serde::{Deserialize, Serialize};

/// Authorization settings for the admin API surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Path to the JSON file listing login ids allowed to call the
    /// rules endpoint in addition to platform admins.
    #[serde(default = "default_admins_file")]
    pub admins_file: String,
    /// Skip the remote authorization check entirely. Only meant for
    /// closed environments and local development.
    #[serde(default)]
    pub allow_all: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admins_file: default_admins_file(),
            allow_all: false,
        }
    }
}

fn default_admins_file() -> String {
    "admins/autostop-acls".to_string()
}
