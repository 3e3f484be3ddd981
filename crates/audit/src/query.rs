//! Audit query filters and pagination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskhub_core::UserId;
use taskhub_orgs::AccessScope;

use crate::action::AuditAction;
use crate::config::AuditConfig;
use crate::entry::AuditEntry;

/// The organizations whose entries a reader may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibleScope {
    /// Every entry, including those with no organization.
    All,
    /// Entries whose organization is in the scope. Entries without an
    /// organization are excluded.
    Within(AccessScope),
}

impl VisibleScope {
    pub fn admits(&self, entry: &AuditEntry) -> bool {
        match self {
            VisibleScope::All => true,
            VisibleScope::Within(scope) => entry
                .organization_id
                .is_some_and(|org| scope.contains(org)),
        }
    }
}

/// Optional criteria, combined with AND on top of the reader's scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilter {
    pub action: Option<AuditAction>,
    pub resource_type: Option<String>,
    pub actor_id: Option<UserId>,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub to: Option<DateTime<Utc>>,
    pub success: Option<bool>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(action) = &self.action {
            if &entry.action != action {
                return false;
            }
        }
        if let Some(resource_type) = &self.resource_type {
            if &entry.resource_type != resource_type {
                return false;
            }
        }
        if let Some(actor_id) = self.actor_id {
            if entry.actor_id != Some(actor_id) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.timestamp > to {
                return false;
            }
        }
        if let Some(success) = self.success {
            if entry.success != success {
                return false;
            }
        }
        true
    }
}

/// Pagination parameters for audit queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of entries to return.
    pub limit: u32,
    /// Offset for pagination (0-based).
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None, &AuditConfig::default())
    }
}

impl Pagination {
    /// Resolve a requested page against the configured caps. Never yields a zero limit,
    /// even when the config carries zeros.
    pub fn new(limit: Option<u32>, offset: Option<u32>, config: &AuditConfig) -> Self {
        let max = config.max_page_size.max(1);
        Self {
            limit: limit.unwrap_or(config.default_page_size).clamp(1, max),
            offset: offset.unwrap_or(0),
        }
    }
}

/// One page of audit entries, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    /// Entries matching scope and filter across all pages, in the same width as `Pagination`.
    pub total: u32,
    pub pagination: Pagination,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::AuditRecord;
    use chrono::Duration;
    use taskhub_core::{AuditEntryId, OrganizationId};

    fn entry(org: Option<OrganizationId>, success: bool, at: DateTime<Utc>) -> AuditEntry {
        AuditEntry::from_record(
            AuditEntryId::new(),
            at,
            AuditRecord {
                action: AuditAction::TASK_UPDATE,
                resource_type: "task".to_string(),
                resource_id: Some("42".to_string()),
                actor_id: None,
                actor_email: None,
                organization_id: org,
                details: serde_json::Value::Null,
                success,
                error_reason: None,
            },
        )
    }

    #[test]
    fn scoped_readers_never_see_org_less_entries() {
        let org = OrganizationId::new();
        let scope = VisibleScope::Within(AccessScope::single(org));
        let now = Utc::now();

        assert!(scope.admits(&entry(Some(org), true, now)));
        assert!(!scope.admits(&entry(None, true, now)));
        assert!(!scope.admits(&entry(Some(OrganizationId::new()), true, now)));
        assert!(VisibleScope::All.admits(&entry(None, true, now)));
    }

    #[test]
    fn filter_fields_are_conjunctive() {
        let now = Utc::now();
        let e = entry(None, false, now);

        assert!(AuditFilter::default().matches(&e));

        let filter = AuditFilter {
            action: Some(AuditAction::TASK_UPDATE),
            success: Some(false),
            from: Some(now - Duration::minutes(1)),
            to: Some(now),
            ..Default::default()
        };
        assert!(filter.matches(&e));

        let wrong_success = AuditFilter {
            success: Some(true),
            ..filter.clone()
        };
        assert!(!wrong_success.matches(&e));

        let too_late = AuditFilter {
            from: Some(now + Duration::seconds(1)),
            ..filter
        };
        assert!(!too_late.matches(&e));
    }

    #[test]
    fn pagination_is_capped_by_config() {
        let config = AuditConfig {
            default_page_size: 20,
            max_page_size: 100,
        };
        assert_eq!(Pagination::new(None, None, &config).limit, 20);
        assert_eq!(Pagination::new(Some(5_000), Some(3), &config), Pagination { limit: 100, offset: 3 });
        assert_eq!(Pagination::new(Some(0), None, &config).limit, 1);
    }

    #[test]
    fn zeroed_config_still_yields_a_usable_page() {
        let config = AuditConfig {
            default_page_size: 0,
            max_page_size: 0,
        };
        assert_eq!(Pagination::new(None, None, &config), Pagination { limit: 1, offset: 0 });
        assert_eq!(Pagination::new(Some(40), Some(2), &config), Pagination { limit: 1, offset: 2 });
    }
}
