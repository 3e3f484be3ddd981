//! The audit trail: best-effort append, scope-gated reads.

use std::sync::Arc;

use thiserror::Error;

use taskhub_auth::permissions::audit;
use taskhub_auth::{AccessDecision, Decision, DenyReason, Principal};
use taskhub_core::{AuditEntryId, Clock, SystemClock};

use crate::action::AuditAction;
use crate::config::AuditConfig;
use crate::entry::{AuditEntry, AuditRecord};
use crate::failure::{AuditFailureReporter, AuditWriteFailed, TracingFailureReporter};
use crate::query::{AuditFilter, AuditPage, Pagination, VisibleScope};
use crate::store::{AuditSink, AuditSource, AuditStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditQueryError {
    #[error("forbidden")]
    Forbidden(DenyReason),

    #[error(transparent)]
    Store(#[from] AuditStoreError),
}

/// Append-only audit log with reads gated by [`AccessDecision`].
///
/// - OWNER reads every entry.
/// - Everyone else reads entries whose organization is in their resolved scope.
/// - Filters narrow that scope; they never replace it.
pub struct AuditTrail {
    sink: Arc<dyn AuditSink>,
    source: Arc<dyn AuditSource>,
    decision: AccessDecision,
    reporter: Arc<dyn AuditFailureReporter>,
    clock: Arc<dyn Clock>,
    config: AuditConfig,
}

impl core::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AuditTrail {
    /// Trail over a store that serves both reads and writes.
    pub fn new<L>(log: Arc<L>, decision: AccessDecision) -> Self
    where
        L: AuditSink + AuditSource + 'static,
    {
        Self::from_parts(log.clone(), log, decision)
    }

    pub fn from_parts(sink: Arc<dyn AuditSink>, source: Arc<dyn AuditSource>, decision: AccessDecision) -> Self {
        Self {
            sink,
            source,
            decision,
            reporter: Arc::new(TracingFailureReporter),
            clock: Arc::new(SystemClock),
            config: AuditConfig::default(),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn AuditFailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    pub fn decision(&self) -> &AccessDecision {
        &self.decision
    }

    /// Stamp and persist one entry.
    ///
    /// On store failure the entry is reported to the failure reporter exactly once
    /// and dropped; the error is returned for information only and must not undo
    /// the caller's primary action.
    pub fn append(&self, record: AuditRecord) -> Result<AuditEntryId, AuditWriteFailed> {
        let id = AuditEntryId::new();
        let entry = AuditEntry::from_record(id, self.clock.now(), record);

        match self.sink.append(entry.clone()) {
            Ok(()) => {
                tracing::debug!(entry_id = %id, action = %entry.action, success = entry.success, "audit entry appended");
                Ok(id)
            }
            Err(source) => {
                let failure = AuditWriteFailed {
                    entry: Box::new(entry),
                    source,
                };
                self.reporter.report(&failure);
                Err(failure)
            }
        }
    }

    /// Entries visible to `principal` that match `filter`, newest first.
    pub fn query(
        &self,
        principal: &Principal,
        filter: &AuditFilter,
        pagination: Pagination,
    ) -> Result<AuditPage, AuditQueryError> {
        if let Decision::Deny(reason) = self.decision.authorize(principal, &audit::READ, None) {
            return Err(AuditQueryError::Forbidden(reason));
        }

        let scope = if principal.is_owner() {
            VisibleScope::All
        } else {
            VisibleScope::Within(self.decision.graph().resolve_scope(principal.organization_id))
        };

        self.page(&scope, filter, pagination)
    }

    /// Failed logins across every organization. OWNER only.
    pub fn failed_logins(&self, principal: &Principal, pagination: Pagination) -> Result<AuditPage, AuditQueryError> {
        if let Decision::Deny(reason) = self.decision.authorize(principal, &audit::READ, None) {
            return Err(AuditQueryError::Forbidden(reason));
        }
        if !principal.is_owner() {
            tracing::info!(principal_id = %principal.id, role = %principal.role, "failed-login view denied");
            return Err(AuditQueryError::Forbidden(DenyReason::InsufficientRole));
        }

        let filter = AuditFilter {
            action: Some(AuditAction::LOGIN_FAILED),
            success: Some(false),
            ..Default::default()
        };
        self.page(&VisibleScope::All, &filter, pagination)
    }

    fn page(
        &self,
        scope: &VisibleScope,
        filter: &AuditFilter,
        pagination: Pagination,
    ) -> Result<AuditPage, AuditQueryError> {
        let mut entries = self.source.find(scope, filter)?;

        // The store is trusted for insertion order only; scope and filter are re-checked here.
        entries.retain(|e| scope.admits(e) && filter.matches(e));

        // Stable sort: equal timestamps keep insertion order.
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let pagination = Pagination::new(Some(pagination.limit), Some(pagination.offset), &self.config);
        let matched = entries.len();
        let total = u32::try_from(matched).unwrap_or(u32::MAX);
        let page: Vec<AuditEntry> = entries
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect();
        let has_more = (pagination.offset as usize).saturating_add(page.len()) < matched;

        Ok(AuditPage {
            entries: page,
            total,
            pagination,
            has_more,
        })
    }
}
