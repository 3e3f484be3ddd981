//! Declarative route → permission table.
//!
//! One table consulted by [`crate::RouteGuard`] instead of per-handler checks.

use std::collections::HashMap;

use taskhub_audit::AuditAction;
use taskhub_auth::{Permission, Role};
use taskhub_auth::permissions::{audit, org, task, user};

/// What a route requires and how attempts on it are audited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// All must be allowed.
    pub permissions: Vec<Permission>,
    /// Role rank required on top of the permissions (e.g. OWNER-only views).
    pub min_role: Option<Role>,
    pub action: AuditAction,
    pub resource_type: &'static str,
}

impl RoutePolicy {
    pub fn new(permission: Permission, action: AuditAction, resource_type: &'static str) -> Self {
        Self {
            permissions: vec![permission],
            min_role: None,
            action,
            resource_type,
        }
    }

    pub fn with_min_role(mut self, role: Role) -> Self {
        self.min_role = Some(role);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<&'static str, RoutePolicy>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: &'static str, policy: RoutePolicy) -> Self {
        self.routes.insert(route, policy);
        self
    }

    /// `None` for unregistered routes; callers must treat that as a denial.
    pub fn policy(&self, route: &str) -> Option<&RoutePolicy> {
        self.routes.get(route)
    }

    pub fn routes(&self) -> impl Iterator<Item = (&'static str, &RoutePolicy)> {
        self.routes.iter().map(|(k, v)| (*k, v))
    }

    /// Routes of the task-management application.
    pub fn standard() -> Self {
        Self::new()
            .with_route("tasks.list", RoutePolicy::new(task::READ, AuditAction::TASK_READ, "task"))
            .with_route("tasks.read", RoutePolicy::new(task::READ, AuditAction::TASK_READ, "task"))
            .with_route("tasks.create", RoutePolicy::new(task::CREATE, AuditAction::TASK_CREATE, "task"))
            .with_route("tasks.update", RoutePolicy::new(task::UPDATE, AuditAction::TASK_UPDATE, "task"))
            .with_route("tasks.delete", RoutePolicy::new(task::DELETE, AuditAction::TASK_DELETE, "task"))
            .with_route("users.list", RoutePolicy::new(user::READ, AuditAction::USER_READ, "user"))
            .with_route("users.read", RoutePolicy::new(user::READ, AuditAction::USER_READ, "user"))
            .with_route("users.create", RoutePolicy::new(user::CREATE, AuditAction::USER_CREATE, "user"))
            .with_route("users.update", RoutePolicy::new(user::UPDATE, AuditAction::USER_UPDATE, "user"))
            .with_route("users.delete", RoutePolicy::new(user::DELETE, AuditAction::USER_DELETE, "user"))
            .with_route("orgs.read", RoutePolicy::new(org::READ, AuditAction::ORG_READ, "organization"))
            .with_route("orgs.update", RoutePolicy::new(org::UPDATE, AuditAction::ORG_UPDATE, "organization"))
            .with_route("orgs.manage", RoutePolicy::new(org::MANAGE, AuditAction::ORG_MANAGE, "organization"))
            .with_route("audit.list", RoutePolicy::new(audit::READ, AuditAction::AUDIT_READ, "audit"))
            .with_route(
                "audit.failed_logins",
                RoutePolicy::new(audit::READ, AuditAction::AUDIT_READ, "audit").with_min_role(Role::Owner),
            )
    }
}
