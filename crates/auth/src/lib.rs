//! `taskhub-auth` — pure authorization boundary (role model + access decisions).
//!
//! This crate is intentionally decoupled from HTTP, token verification and audit
//! storage. Decisions are values; callers own the audit obligation.

pub mod claims;
pub mod decision;
pub mod explain;
pub mod model;
pub mod permissions;
pub mod principal;
pub mod resource;
pub mod roles;

pub use claims::{ClaimsError, VerifiedClaims};
pub use decision::{AccessDecision, AuthzError, Decision, DenyReason};
pub use explain::{AuthorizationExplanation, DecisionStep};
pub use model::{RoleDefinition, catalogue, has_permission, permissions_of, role_name_has_permission};
pub use permissions::{Permission, PermissionParseError};
pub use principal::Principal;
pub use resource::ResourceDescriptor;
pub use roles::{Role, UnknownRole};
