use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Stable audit action identifier (e.g. `LOGIN_FAILED`, `TASK_DELETE`).
///
/// Well-known actions are associated constants; collaborators may record
/// custom actions with [`AuditAction::custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditAction(Cow<'static, str>);

impl AuditAction {
    pub const LOGIN: AuditAction = AuditAction::from_static("LOGIN");
    pub const LOGIN_FAILED: AuditAction = AuditAction::from_static("LOGIN_FAILED");
    pub const LOGOUT: AuditAction = AuditAction::from_static("LOGOUT");
    pub const ACCESS_DENIED: AuditAction = AuditAction::from_static("ACCESS_DENIED");

    pub const TASK_CREATE: AuditAction = AuditAction::from_static("TASK_CREATE");
    pub const TASK_READ: AuditAction = AuditAction::from_static("TASK_READ");
    pub const TASK_UPDATE: AuditAction = AuditAction::from_static("TASK_UPDATE");
    pub const TASK_DELETE: AuditAction = AuditAction::from_static("TASK_DELETE");

    pub const USER_CREATE: AuditAction = AuditAction::from_static("USER_CREATE");
    pub const USER_READ: AuditAction = AuditAction::from_static("USER_READ");
    pub const USER_UPDATE: AuditAction = AuditAction::from_static("USER_UPDATE");
    pub const USER_DELETE: AuditAction = AuditAction::from_static("USER_DELETE");

    pub const ORG_READ: AuditAction = AuditAction::from_static("ORG_READ");
    pub const ORG_UPDATE: AuditAction = AuditAction::from_static("ORG_UPDATE");
    pub const ORG_MANAGE: AuditAction = AuditAction::from_static("ORG_MANAGE");

    pub const AUDIT_READ: AuditAction = AuditAction::from_static("AUDIT_READ");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
