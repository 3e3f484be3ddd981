//! Hierarchical scope resolution.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use taskhub_core::OrganizationId;

use crate::store::OrganizationStore;

/// The set of organizations a principal may act within.
///
/// Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessScope {
    organizations: BTreeSet<OrganizationId>,
}

impl AccessScope {
    /// Scope containing exactly one organization.
    pub fn single(id: OrganizationId) -> Self {
        Self {
            organizations: BTreeSet::from([id]),
        }
    }

    pub fn contains(&self, id: OrganizationId) -> bool {
        self.organizations.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = OrganizationId> + '_ {
        self.organizations.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }

    pub fn into_set(self) -> BTreeSet<OrganizationId> {
        self.organizations
    }
}

/// Queryable view of the two-level organization hierarchy.
#[derive(Clone)]
pub struct OrganizationGraph {
    store: Arc<dyn OrganizationStore>,
}

impl core::fmt::Debug for OrganizationGraph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrganizationGraph").finish_non_exhaustive()
    }
}

impl OrganizationGraph {
    pub fn new(store: Arc<dyn OrganizationStore>) -> Self {
        Self { store }
    }

    /// Direct children of `org_id`. Empty when the org is unknown or the store fails.
    pub fn children_of(&self, org_id: OrganizationId) -> BTreeSet<OrganizationId> {
        match self.store.children_of(org_id) {
            Ok(children) => children.into_iter().map(|o| o.id).collect(),
            Err(e) => {
                tracing::warn!(org_id = %org_id, error = %e, "children lookup failed");
                BTreeSet::new()
            }
        }
    }

    /// Parent of `org_id`, or `None` for roots and unknown organizations.
    pub fn parent_of(&self, org_id: OrganizationId) -> Option<OrganizationId> {
        match self.store.get(org_id) {
            Ok(org) => org.and_then(|o| o.parent_id),
            Err(e) => {
                tracing::warn!(org_id = %org_id, error = %e, "organization lookup failed");
                None
            }
        }
    }

    /// Resolve the organizations visible from `principal_org_id`.
    ///
    /// - root org: itself plus its direct children
    /// - child org: itself only (no parent, no siblings)
    /// - unknown org or store failure: itself only
    ///
    /// Deeper nesting is capped: a root never reaches grandchildren, and an org
    /// with a parent never gains its own children.
    pub fn resolve_scope(&self, principal_org_id: OrganizationId) -> AccessScope {
        let mut scope = AccessScope::single(principal_org_id);

        let org = match self.store.get(principal_org_id) {
            Ok(Some(org)) => org,
            Ok(None) => {
                tracing::debug!(org_id = %principal_org_id, "organization not found; minimal scope");
                return scope;
            }
            Err(e) => {
                tracing::warn!(org_id = %principal_org_id, error = %e, "organization lookup failed; minimal scope");
                return scope;
            }
        };

        let children = match self.store.children_of(principal_org_id) {
            Ok(children) => children,
            Err(e) => {
                tracing::warn!(org_id = %principal_org_id, error = %e, "children lookup failed; minimal scope");
                return scope;
            }
        };

        if !org.is_root() {
            if !children.is_empty() {
                tracing::warn!(
                    org_id = %principal_org_id,
                    parent_id = ?org.parent_id,
                    children = children.len(),
                    "organization nesting exceeds two levels; children ignored"
                );
            }
            return scope;
        }

        scope
            .organizations
            .extend(children.into_iter().map(|c| c.id));
        scope
    }
}
