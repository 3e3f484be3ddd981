//! `taskhub-orgs` — the two-level organization hierarchy and scope resolution.
//!
//! Parents see down into their direct children; children never see up or sideways.

pub mod graph;
pub mod organization;
pub mod store;

pub use graph::{AccessScope, OrganizationGraph};
pub use organization::{Organization, OrganizationError, validate_new_organization};
pub use store::{InMemoryOrganizationStore, OrgStoreError, OrganizationStore};
