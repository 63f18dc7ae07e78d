//! Authorizer capability trait and its implementations.

use async_trait::async_trait;
use tracing::info;

use autostop_core::result::AppResult;

use crate::acl::AclRules;
use crate::principal::PrincipalClient;

/// Capability consumed by the rule engine: can this credential apply
/// auto-shutdown rules?
///
/// `false` is a terminal rejection; an `Err` means the authority itself
/// could not be consulted and the whole operation must abort.
#[async_trait]
pub trait Authorizer: Send + Sync + 'static {
    /// Check whether the caller behind `api_key` may apply rules.
    async fn is_authorized(&self, api_key: &str) -> AppResult<bool>;
}

/// Production authorizer: resolves the principal via the identity
/// service and allows platform admins plus ACL-listed users.
#[derive(Debug, Clone)]
pub struct RemoteAuthorizer {
    client: PrincipalClient,
    acl: AclRules,
}

impl RemoteAuthorizer {
    /// Create a remote authorizer from a principal client and ACL rules.
    pub fn new(client: PrincipalClient, acl: AclRules) -> Self {
        Self { client, acl }
    }
}

#[async_trait]
impl Authorizer for RemoteAuthorizer {
    async fn is_authorized(&self, api_key: &str) -> AppResult<bool> {
        let principal = self.client.whoami(api_key).await?;

        if principal.is_admin {
            info!(caller = %principal.canonical_name, "Allowing caller: platform admin");
            return Ok(true);
        }

        if self.acl.contains(&principal.canonical_name) {
            info!(caller = %principal.canonical_name, "Allowing caller: listed in admin ACL");
            return Ok(true);
        }

        Ok(false)
    }
}

/// Authorizer that allows every caller.
///
/// For tests and closed environments with no identity service.
#[derive(Debug, Clone, Default)]
pub struct AllowAllAuthorizer;

#[async_trait]
impl Authorizer for AllowAllAuthorizer {
    async fn is_authorized(&self, _api_key: &str) -> AppResult<bool> {
        Ok(true)
    }
}
