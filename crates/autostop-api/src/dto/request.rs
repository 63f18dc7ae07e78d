//! Request DTOs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use autostop_entity::policy::RuleOverrides;

/// Body of `POST /autoshutdownrules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoShutdownRulesRequest {
    /// Requested lifetime in seconds, keyed by login id. Negative values
    /// delete the user's preference record.
    #[serde(default)]
    pub users: HashMap<String, i64>,
    /// Apply the global default lifetime to every user not named above.
    #[serde(default)]
    pub override_to_default: bool,
}

impl AutoShutdownRulesRequest {
    /// Convert the wire payload into the domain override request.
    pub fn into_overrides(self) -> RuleOverrides {
        RuleOverrides {
            users: self.users,
            override_to_default: self.override_to_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_body() {
        let request: AutoShutdownRulesRequest =
            serde_json::from_str(r#"{"users": {"alice": 7200}, "overrideToDefault": true}"#)
                .unwrap();

        assert_eq!(request.users.get("alice"), Some(&7200));
        assert!(request.override_to_default);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let request: AutoShutdownRulesRequest = serde_json::from_str("{}").unwrap();
        assert!(request.users.is_empty());
        assert!(!request.override_to_default);
    }
}
