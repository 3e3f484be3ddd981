//! Role → permission table.
//!
//! This answers "does this role category ever hold this permission". Row-level
//! rules (e.g. viewers reading only their own records) live in
//! [`crate::decision`].
//!
//! `user:delete`, `org:update` and `org:manage` are OWNER-exclusive even though
//! ADMIN inherits everything else OWNER holds.

use serde::Serialize;

use crate::permissions::{Permission, audit, org, task, user};
use crate::roles::Role;

static OWNER_PERMISSIONS: [Permission; 12] = [
    task::CREATE,
    task::READ,
    task::UPDATE,
    task::DELETE,
    user::CREATE,
    user::READ,
    user::UPDATE,
    user::DELETE,
    org::READ,
    org::UPDATE,
    org::MANAGE,
    audit::READ,
];

static ADMIN_PERMISSIONS: [Permission; 9] = [
    task::CREATE,
    task::READ,
    task::UPDATE,
    task::DELETE,
    user::CREATE,
    user::READ,
    user::UPDATE,
    org::READ,
    audit::READ,
];

static VIEWER_PERMISSIONS: [Permission; 3] = [task::READ, user::READ, org::READ];

pub fn rank_of(role: Role) -> u8 {
    role.rank()
}

pub fn is_at_least(role: Role, required: Role) -> bool {
    role.is_at_least(required)
}

pub fn permissions_of(role: Role) -> &'static [Permission] {
    match role {
        Role::Owner => &OWNER_PERMISSIONS,
        Role::Admin => &ADMIN_PERMISSIONS,
        Role::Viewer => &VIEWER_PERMISSIONS,
    }
}

pub fn has_permission(role: Role, permission: &Permission) -> bool {
    permissions_of(role).contains(permission)
}

/// Permission check for a role that has not been parsed yet.
///
/// Unrecognized role names hold no permissions.
pub fn role_name_has_permission(role: &str, permission: &Permission) -> bool {
    match role.parse::<Role>() {
        Ok(role) => has_permission(role, permission),
        Err(_) => {
            tracing::warn!(role, permission = %permission, "permission check for unknown role");
            false
        }
    }
}

/// Role definition with its granted permissions (for admin/debug views).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: &'static str,
    pub rank: u8,
    pub description: &'static str,
    pub permissions: Vec<String>,
}

/// Every role with its rank and sorted permission list, highest rank first.
pub fn catalogue() -> Vec<RoleDefinition> {
    Role::ALL
        .iter()
        .map(|&role| {
            let mut permissions: Vec<String> = permissions_of(role)
                .iter()
                .map(|p| p.as_str().to_string())
                .collect();
            permissions.sort();

            RoleDefinition {
                name: role.as_str(),
                rank: role.rank(),
                description: role_description(role),
                permissions,
            }
        })
        .collect()
}

fn role_description(role: Role) -> &'static str {
    match role {
        Role::Owner => "Full control across every organization, including user deletion and org management",
        Role::Admin => "Manages tasks and users within their organization scope; can read the audit log",
        Role::Viewer => "Read-only access limited to their own records",
    }
}
