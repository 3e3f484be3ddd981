//! Explanations of access decisions ("why was this request denied?").

use serde::Serialize;

use taskhub_core::{OrganizationId, UserId};
use taskhub_orgs::AccessScope;

use crate::decision::{AccessDecision, Decision};
use crate::model;
use crate::permissions::Permission;
use crate::principal::Principal;
use crate::resource::ResourceDescriptor;
use crate::roles::Role;

/// The step of the decision algorithm that settled the outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStep {
    RolePermission,
    CategoryLevel,
    OwnerBypass,
    SelfAccess,
    ViewerRestriction,
    OrganizationScope,
}

/// Detailed, serializable account of one decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub permission: String,
    pub decision: Decision,
    pub step: DecisionStep,
    pub reason: String,
    pub principal_id: UserId,
    pub role: Role,
    pub role_permissions: Vec<String>,
    pub resource: Option<ResourceDescriptor>,
    /// Organizations consulted, when the organization-scope step ran.
    pub scope: Option<Vec<OrganizationId>>,
}

impl AccessDecision {
    /// Same algorithm as [`AccessDecision::authorize`], with the reasoning attached.
    pub fn explain(
        &self,
        principal: &Principal,
        permission: &Permission,
        resource: Option<&ResourceDescriptor>,
    ) -> AuthorizationExplanation {
        let evaluation = self.evaluate(principal, permission, resource);

        let mut role_permissions: Vec<String> = model::permissions_of(principal.role)
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        role_permissions.sort();

        AuthorizationExplanation {
            permission: permission.as_str().to_string(),
            decision: evaluation.decision,
            step: evaluation.step,
            reason: describe(evaluation.step, evaluation.decision, principal, permission),
            principal_id: principal.id,
            role: principal.role,
            role_permissions,
            resource: resource.copied(),
            scope: evaluation.scope.map(|s: AccessScope| s.iter().collect()),
        }
    }
}

fn describe(step: DecisionStep, decision: Decision, principal: &Principal, permission: &Permission) -> String {
    match (step, decision) {
        (DecisionStep::RolePermission, _) => {
            format!("role '{}' does not hold '{}'", principal.role, permission)
        }
        (DecisionStep::CategoryLevel, _) => {
            format!("role '{}' holds '{}' (no specific record)", principal.role, permission)
        }
        (DecisionStep::OwnerBypass, _) => "owner role is not limited by organization scope".to_string(),
        (DecisionStep::SelfAccess, _) => "principal owns the record".to_string(),
        (DecisionStep::ViewerRestriction, _) => {
            "viewers may only read records they own".to_string()
        }
        (DecisionStep::OrganizationScope, Decision::Allow) => {
            "record's organization is within the principal's scope".to_string()
        }
        (DecisionStep::OrganizationScope, Decision::Deny(_)) => {
            "record's organization is outside the principal's scope".to_string()
        }
    }
}
