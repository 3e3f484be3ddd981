use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use taskhub_core::OrganizationId;

use crate::organization::Organization;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrgStoreError {
    #[error("organization store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to organization records.
///
/// The org-management collaborator owns writes; this core only reads.
pub trait OrganizationStore: Send + Sync {
    fn get(&self, id: OrganizationId) -> Result<Option<Organization>, OrgStoreError>;

    /// Organizations whose `parent_id` equals `parent_id`.
    fn children_of(&self, parent_id: OrganizationId) -> Result<Vec<Organization>, OrgStoreError>;
}

impl<S> OrganizationStore for Arc<S>
where
    S: OrganizationStore + ?Sized,
{
    fn get(&self, id: OrganizationId) -> Result<Option<Organization>, OrgStoreError> {
        (**self).get(id)
    }

    fn children_of(&self, parent_id: OrganizationId) -> Result<Vec<Organization>, OrgStoreError> {
        (**self).children_of(parent_id)
    }
}

/// In-memory organization store for tests/dev.
///
/// `insert` does not validate the hierarchy, so tests can simulate records that
/// bypassed creation-time checks.
#[derive(Debug, Default)]
pub struct InMemoryOrganizationStore {
    inner: RwLock<HashMap<OrganizationId, Organization>>,
}

impl InMemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, org: Organization) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(org.id, org);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrganizationStore for InMemoryOrganizationStore {
    fn get(&self, id: OrganizationId) -> Result<Option<Organization>, OrgStoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| OrgStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(&id).cloned())
    }

    fn children_of(&self, parent_id: OrganizationId) -> Result<Vec<Organization>, OrgStoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| OrgStoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(map
            .values()
            .filter(|o| o.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }
}
