use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::entry::AuditEntry;
use crate::query::{AuditFilter, VisibleScope};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditStoreError {
    #[error("audit store unavailable: {0}")]
    Unavailable(String),

    #[error("audit store timed out")]
    Timeout,
}

/// Append-only write side of the audit store.
///
/// No update or delete operation exists.
pub trait AuditSink: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditStoreError>;
}

/// Read side of the audit store.
pub trait AuditSource: Send + Sync {
    /// Entries admitted by `scope` and matching `filter`, in insertion order.
    fn find(&self, scope: &VisibleScope, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError>;
}

impl<S> AuditSink for Arc<S>
where
    S: AuditSink + ?Sized,
{
    fn append(&self, entry: AuditEntry) -> Result<(), AuditStoreError> {
        (**self).append(entry)
    }
}

impl<S> AuditSource for Arc<S>
where
    S: AuditSource + ?Sized,
{
    fn find(&self, scope: &VisibleScope, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError> {
        (**self).find(scope, filter)
    }
}

/// In-memory append-only audit log.
///
/// Intended for tests/dev. `set_failure` makes every read and write fail with a chosen error.
#[derive(Debug)]
pub struct InMemoryAuditLog {
    entries: RwLock<Vec<AuditEntry>>,
    failure: RwLock<Option<AuditStoreError>>,
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an `Unavailable` outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.set_failure((!available).then(|| AuditStoreError::Unavailable("store offline".to_string())));
    }

    /// Fail every subsequent call with `failure`; `None` restores normal operation.
    pub fn set_failure(&self, failure: Option<AuditStoreError>) {
        match self.failure.write() {
            Ok(mut slot) => *slot = failure,
            Err(poisoned) => *poisoned.into_inner() = failure,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry in insertion order, bypassing scope (tests/dev only).
    pub fn snapshot(&self) -> Vec<AuditEntry> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }

    fn ensure_available(&self) -> Result<(), AuditStoreError> {
        let failure = self
            .failure
            .read()
            .map_err(|_| AuditStoreError::Unavailable("lock poisoned".to_string()))?;
        match failure.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl AuditSink for InMemoryAuditLog {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditStoreError> {
        self.ensure_available()?;

        let mut entries = self
            .entries
            .write()
            .map_err(|_| AuditStoreError::Unavailable("lock poisoned".to_string()))?;
        entries.push(entry);
        Ok(())
    }
}

impl AuditSource for InMemoryAuditLog {
    fn find(&self, scope: &VisibleScope, filter: &AuditFilter) -> Result<Vec<AuditEntry>, AuditStoreError> {
        self.ensure_available()?;

        let entries = self
            .entries
            .read()
            .map_err(|_| AuditStoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(entries
            .iter()
            .filter(|e| scope.admits(e) && filter.matches(e))
            .cloned()
            .collect())
    }
}
