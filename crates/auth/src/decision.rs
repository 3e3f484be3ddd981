//! Allow/deny decisions combining the role model with organization scope.

use serde::Serialize;
use thiserror::Error;

use taskhub_orgs::{AccessScope, OrganizationGraph};

use crate::explain::DecisionStep;
use crate::model;
use crate::permissions::Permission;
use crate::principal::Principal;
use crate::resource::ResourceDescriptor;
use crate::roles::Role;

/// Why a request was denied.
///
/// Reason codes are for logs and audit entries; end users only ever see
/// "forbidden".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// The role never holds the permission.
    InsufficientRole,
    /// The role holds the permission but the resource is outside the principal's scope.
    OutOfScope,
    /// A viewer attempted to read a record that is not their own.
    ViewerRestrictedToOwn,
}

impl DenyReason {
    pub const fn code(self) -> &'static str {
        match self {
            DenyReason::InsufficientRole => "insufficient_role",
            DenyReason::OutOfScope => "out_of_scope",
            DenyReason::ViewerRestrictedToOwn => "viewer_restricted_to_own",
        }
    }
}

impl core::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<(), AuthzError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(AuthzError::Forbidden(reason)),
        }
    }
}

/// Denial as an error, for callers that prefer `?`.
///
/// `Display` is deliberately generic; use [`AuthzError::reason`] for logs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden")]
    Forbidden(DenyReason),
}

impl AuthzError {
    pub fn reason(&self) -> DenyReason {
        match self {
            AuthzError::Forbidden(reason) => *reason,
        }
    }
}

/// Outcome of the decision algorithm with the step that settled it.
#[derive(Debug, Clone)]
pub(crate) struct Evaluation {
    pub decision: Decision,
    pub step: DecisionStep,
    pub scope: Option<AccessScope>,
}

/// Pure decision function over the role model and the organization graph.
///
/// - No audit writes (callers record outcomes)
/// - No panics
#[derive(Debug, Clone)]
pub struct AccessDecision {
    graph: OrganizationGraph,
}

impl AccessDecision {
    pub fn new(graph: OrganizationGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &OrganizationGraph {
        &self.graph
    }

    /// Decide whether `principal` may exercise `permission`, optionally on a specific record.
    ///
    /// Without a resource this is a category-level check ("may this role list tasks at all").
    pub fn authorize(
        &self,
        principal: &Principal,
        permission: &Permission,
        resource: Option<&ResourceDescriptor>,
    ) -> Decision {
        let evaluation = self.evaluate(principal, permission, resource);

        match evaluation.decision {
            Decision::Allow => tracing::debug!(
                principal_id = %principal.id,
                role = %principal.role,
                permission = %permission,
                step = ?evaluation.step,
                "access allowed"
            ),
            Decision::Deny(reason) => tracing::info!(
                principal_id = %principal.id,
                role = %principal.role,
                permission = %permission,
                organization_id = ?resource.map(|r| r.organization_id),
                reason = reason.code(),
                "access denied"
            ),
        }

        evaluation.decision
    }

    pub(crate) fn evaluate(
        &self,
        principal: &Principal,
        permission: &Permission,
        resource: Option<&ResourceDescriptor>,
    ) -> Evaluation {
        let done = |decision, step| Evaluation {
            decision,
            step,
            scope: None,
        };

        if !model::has_permission(principal.role, permission) {
            return done(Decision::Deny(DenyReason::InsufficientRole), DecisionStep::RolePermission);
        }

        let Some(resource) = resource else {
            return done(Decision::Allow, DecisionStep::CategoryLevel);
        };

        if principal.role == Role::Owner {
            return done(Decision::Allow, DecisionStep::OwnerBypass);
        }

        if resource.owner_id == Some(principal.id) {
            return done(Decision::Allow, DecisionStep::SelfAccess);
        }

        if permission.is_read_only() && principal.role == Role::Viewer {
            return done(
                Decision::Deny(DenyReason::ViewerRestrictedToOwn),
                DecisionStep::ViewerRestriction,
            );
        }

        let scope = self.graph.resolve_scope(principal.organization_id);
        let decision = if scope.contains(resource.organization_id) {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::OutOfScope)
        };

        Evaluation {
            decision,
            step: DecisionStep::OrganizationScope,
            scope: Some(scope),
        }
    }
}
