use serde::{Deserialize, Serialize};

use taskhub_core::{OrganizationId, UserId};

use crate::roles::Role;

/// The authenticated actor for one request.
///
/// Built fresh from verified claims on each request and never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub organization_id: OrganizationId,
}

impl Principal {
    pub fn new(id: UserId, email: impl Into<String>, role: Role, organization_id: OrganizationId) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            organization_id,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}
