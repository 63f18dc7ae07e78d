//! # autostop-auth
//!
//! Authorization gate for the Cirrus auto-shutdown service. The rule
//! engine only consumes a boolean allow/deny; everything here — the
//! identity-service principal lookup and the admin ACL file — exists to
//! produce that boolean.

pub mod acl;
pub mod authorizer;
pub mod principal;

pub use acl::AclRules;
pub use authorizer::{AllowAllAuthorizer, Authorizer, RemoteAuthorizer};
pub use principal::{Principal, PrincipalClient, API_KEY_HEADER};
