//! `taskhub-audit` — append-only audit trail with scope-gated reads.
//!
//! Writes never fail the caller's primary operation: a store failure is reported
//! once to an [`AuditFailureReporter`] and the entry is discarded.

pub mod action;
pub mod config;
pub mod entry;
pub mod failure;
pub mod query;
pub mod store;
pub mod trail;

pub use action::AuditAction;
pub use config::AuditConfig;
pub use entry::{AuditEntry, AuditRecord};
pub use failure::{AuditFailureReporter, AuditWriteFailed, RecordingFailureReporter, TracingFailureReporter};
pub use query::{AuditFilter, AuditPage, Pagination, VisibleScope};
pub use store::{AuditSink, AuditSource, AuditStoreError, InMemoryAuditLog};
pub use trail::{AuditQueryError, AuditTrail};
