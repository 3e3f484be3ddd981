//! `taskhub-core` — shared building blocks for the authorization and audit crates.
//!
//! This crate contains no policy and no IO.

pub mod clock;
pub mod error;
pub mod id;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DomainError, DomainResult};
pub use id::{AuditEntryId, OrganizationId, UserId};
