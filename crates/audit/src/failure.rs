//! Reporting of audit writes that could not be persisted.

use std::sync::Mutex;

use thiserror::Error;

use crate::entry::AuditEntry;
use crate::store::AuditStoreError;

/// An audit entry was dropped because the store rejected it.
///
/// Reported once; never retried.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("audit write failed for {} ({}): {source}", .entry.action, .entry.id)]
pub struct AuditWriteFailed {
    pub entry: Box<AuditEntry>,
    #[source]
    pub source: AuditStoreError,
}

/// Observability sink for dropped audit writes.
pub trait AuditFailureReporter: Send + Sync {
    fn report(&self, failure: &AuditWriteFailed);
}

/// Logs the failure and the dropped entry through `tracing`.
#[derive(Debug, Default, Copy, Clone)]
pub struct TracingFailureReporter;

impl AuditFailureReporter for TracingFailureReporter {
    fn report(&self, failure: &AuditWriteFailed) {
        let entry = serde_json::to_string(&failure.entry).unwrap_or_else(|e| format!("<unserializable: {e}>"));
        tracing::error!(
            signal = "AuditWriteFailed",
            entry_id = %failure.entry.id,
            action = %failure.entry.action,
            error = %failure.source,
            entry = %entry,
            "audit write failed; entry dropped"
        );
    }
}

/// Collects failures in memory (tests/dev).
#[derive(Debug, Default)]
pub struct RecordingFailureReporter {
    failures: Mutex<Vec<AuditWriteFailed>>,
}

impl RecordingFailureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> Vec<AuditWriteFailed> {
        self.failures.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

impl AuditFailureReporter for RecordingFailureReporter {
    fn report(&self, failure: &AuditWriteFailed) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(failure.clone());
        }
    }
}
