use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use taskhub_core::{AuditEntryId, OrganizationId, UserId};

use crate::action::AuditAction;

/// An audit event ready to be appended (not yet assigned an id or timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<String>,
    /// `None` for anonymous events (e.g. a failed login before identity is known).
    pub actor_id: Option<UserId>,
    /// Denormalized so the entry stays readable after the actor is deleted.
    pub actor_email: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub details: JsonValue,
    pub success: bool,
    pub error_reason: Option<String>,
}

/// A persisted audit entry.
///
/// Immutable once written. Field names are the export contract for dashboards
/// and compliance tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub actor_id: Option<UserId>,
    pub actor_email: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub details: JsonValue,
    pub success: bool,
    pub error_reason: Option<String>,
    /// Fixed at write time.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn from_record(id: AuditEntryId, timestamp: DateTime<Utc>, record: AuditRecord) -> Self {
        Self {
            id,
            action: record.action,
            resource_type: record.resource_type,
            resource_id: record.resource_id,
            actor_id: record.actor_id,
            actor_email: record.actor_email,
            organization_id: record.organization_id,
            details: record.details,
            success: record.success,
            error_reason: record.error_reason,
            timestamp,
        }
    }
}
