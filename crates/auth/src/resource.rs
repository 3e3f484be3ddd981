use serde::{Deserialize, Serialize};

use taskhub_core::{OrganizationId, UserId};

/// What an access check needs to know about a specific record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// User who owns the record (a task's creator, or the user record itself).
    pub owner_id: Option<UserId>,
    pub organization_id: OrganizationId,
}

impl ResourceDescriptor {
    pub fn owned_by(owner_id: UserId, organization_id: OrganizationId) -> Self {
        Self {
            owner_id: Some(owner_id),
            organization_id,
        }
    }

    /// A record with no owning user (e.g. an organization).
    pub fn in_organization(organization_id: OrganizationId) -> Self {
        Self {
            owner_id: None,
            organization_id,
        }
    }
}
