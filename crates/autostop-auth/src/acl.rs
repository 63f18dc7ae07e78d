//! Admin ACL file loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use autostop_core::error::AppError;
use autostop_core::result::AppResult;

/// Login ids allowed to call the admin API in addition to platform admins.
///
/// Loaded once at startup from a JSON file of the form
/// `{"users": ["alice", "bob"]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AclRules {
    /// Allowed login ids.
    #[serde(default)]
    pub users: Vec<String>,
}

impl AclRules {
    /// Load the ACL file from disk.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::configuration(format!("Failed to read ACL file '{}': {e}", path.display()))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            AppError::configuration(format!("Invalid ACL file '{}': {e}", path.display()))
        })
    }

    /// Whether a login id is listed.
    pub fn contains(&self, login_id: &str) -> bool {
        self.users.iter().any(|u| u == login_id)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_users_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"users": ["alice", "bob"]}}"#).unwrap();

        let acl = AclRules::load(file.path()).unwrap();
        assert!(acl.contains("alice"));
        assert!(acl.contains("bob"));
        assert!(!acl.contains("mallory"));
    }

    #[test]
    fn missing_users_key_means_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let acl = AclRules::load(file.path()).unwrap();
        assert!(acl.users.is_empty());
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = AclRules::load("/nonexistent/acl-file").unwrap_err();
        assert_eq!(err.kind, autostop_core::error::ErrorKind::Configuration);
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = AclRules::load(file.path()).unwrap_err();
        assert_eq!(err.kind, autostop_core::error::ErrorKind::Configuration);
    }
}
