use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Atomic capability tag of the form `resource:action` (e.g. `task:delete`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed permission '{0}' (expected 'resource:action')")]
pub struct PermissionParseError(pub String);

impl Permission {
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Parse a tag, validating the `resource:action` shape.
    pub fn parse(tag: impl Into<Cow<'static, str>>) -> Result<Self, PermissionParseError> {
        let tag = tag.into();
        let valid = match tag.split_once(':') {
            Some((resource, action)) => {
                is_segment(resource) && is_segment(action)
            }
            None => false,
        };

        if valid {
            Ok(Self(tag))
        } else {
            Err(PermissionParseError(tag.into_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn resource(&self) -> &str {
        self.as_str().split_once(':').map(|(r, _)| r).unwrap_or("")
    }

    pub fn action(&self) -> &str {
        self.as_str().split_once(':').map(|(_, a)| a).unwrap_or("")
    }

    pub fn is_read_only(&self) -> bool {
        self.action() == "read"
    }
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

pub mod task {
    use super::Permission;

    pub const CREATE: Permission = Permission::from_static("task:create");
    pub const READ: Permission = Permission::from_static("task:read");
    pub const UPDATE: Permission = Permission::from_static("task:update");
    pub const DELETE: Permission = Permission::from_static("task:delete");
}

pub mod user {
    use super::Permission;

    pub const CREATE: Permission = Permission::from_static("user:create");
    pub const READ: Permission = Permission::from_static("user:read");
    pub const UPDATE: Permission = Permission::from_static("user:update");
    pub const DELETE: Permission = Permission::from_static("user:delete");
}

pub mod org {
    use super::Permission;

    pub const READ: Permission = Permission::from_static("org:read");
    pub const UPDATE: Permission = Permission::from_static("org:update");
    pub const MANAGE: Permission = Permission::from_static("org:manage");
}

pub mod audit {
    use super::Permission;

    pub const READ: Permission = Permission::from_static("audit:read");
}

/// Every permission known to the role model.
pub static ALL: [Permission; 12] = [
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
