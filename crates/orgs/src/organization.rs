//! Organization record and creation-time hierarchy rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskhub_core::OrganizationId;

use crate::store::{OrgStoreError, OrganizationStore};

/// An organization node.
///
/// # Invariants
/// - Depth is at most two: an organization with a `parent_id` has no children.
/// - The invariant is checked when organizations are created (see
///   [`validate_new_organization`]); scope resolution assumes it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub parent_id: Option<OrganizationId>,
}

impl Organization {
    pub fn root(id: OrganizationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: None,
        }
    }

    pub fn child(id: OrganizationId, name: impl Into<String>, parent_id: OrganizationId) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id: Some(parent_id),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrganizationError {
    #[error("organization name cannot be empty")]
    EmptyName,

    #[error("organization cannot be its own parent")]
    SelfParent,

    #[error("parent organization {0} not found")]
    ParentNotFound(OrganizationId),

    #[error("parent organization {0} is itself a child; hierarchy is limited to two levels")]
    NestingTooDeep(OrganizationId),

    #[error(transparent)]
    Store(#[from] OrgStoreError),
}

/// Validate a new organization against the two-level hierarchy rule.
///
/// Intended for the org-management collaborator to call before persisting.
pub fn validate_new_organization<S>(store: &S, org: &Organization) -> Result<(), OrganizationError>
where
    S: OrganizationStore + ?Sized,
{
    if org.name.trim().is_empty() {
        return Err(OrganizationError::EmptyName);
    }

    let Some(parent_id) = org.parent_id else {
        return Ok(());
    };

    if parent_id == org.id {
        return Err(OrganizationError::SelfParent);
    }

    let parent = store
        .get(parent_id)?
        .ok_or(OrganizationError::ParentNotFound(parent_id))?;

    if !parent.is_root() {
        return Err(OrganizationError::NestingTooDeep(parent_id));
    }

    Ok(())
}
