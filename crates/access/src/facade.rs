use serde_json::Value as JsonValue;

use taskhub_audit::{AuditAction, AuditRecord, AuditTrail};
use taskhub_auth::{AccessDecision, AuthorizationExplanation, Decision, Permission, Principal, ResourceDescriptor};
use taskhub_core::{OrganizationId, UserId};

/// What happened, as reported by the collaborator after an attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub success: bool,
    pub details: JsonValue,
    pub error_reason: Option<String>,
}

impl AuditEvent {
    pub fn succeeded(action: AuditAction, resource_type: impl Into<String>) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id: None,
            success: true,
            details: JsonValue::Null,
            error_reason: None,
        }
    }

    pub fn failed(action: AuditAction, resource_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id: None,
            success: false,
            details: JsonValue::Null,
            error_reason: Some(reason.into()),
        }
    }

    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = details;
        self
    }
}

/// Authorization and audit in one place.
///
/// Contract for callers: every `authorize` that returns `Deny` is followed by
/// exactly one `record` with `success = false`.
#[derive(Debug)]
pub struct AuthorizationFacade {
    trail: AuditTrail,
}

impl AuthorizationFacade {
    pub fn new(trail: AuditTrail) -> Self {
        Self { trail }
    }

    pub fn decision(&self) -> &AccessDecision {
        self.trail.decision()
    }

    /// Audit reads (queries, failed-login view) go through the trail directly.
    pub fn audit(&self) -> &AuditTrail {
        &self.trail
    }

    pub fn authorize(
        &self,
        principal: &Principal,
        permission: &Permission,
        resource: Option<&ResourceDescriptor>,
    ) -> Decision {
        self.trail.decision().authorize(principal, permission, resource)
    }

    pub fn explain(
        &self,
        principal: &Principal,
        permission: &Permission,
        resource: Option<&ResourceDescriptor>,
    ) -> AuthorizationExplanation {
        self.trail.decision().explain(principal, permission, resource)
    }

    /// Append one audit entry. Never fails the caller.
    ///
    /// `principal` is `None` when no identity is established (e.g. failed login).
    pub fn record(&self, principal: Option<&Principal>, event: AuditEvent) {
        self.append(
            event,
            principal.map(|p| p.id),
            principal.map(|p| p.email.clone()),
            principal.map(|p| p.organization_id),
        );
    }

    /// Record a login attempt that did not establish an identity.
    pub fn record_login_failed(&self, submitted_email: &str, reason: impl Into<String>) {
        let event = AuditEvent::failed(AuditAction::LOGIN_FAILED, "auth", reason);
        self.append(event, None, Some(submitted_email.to_string()), None);
    }

    pub fn record_login_succeeded(&self, principal: &Principal) {
        self.record(Some(principal), AuditEvent::succeeded(AuditAction::LOGIN, "auth"));
    }

    // Failures were already reported by the trail; callers never see them.
    fn append(
        &self,
        event: AuditEvent,
        actor_id: Option<UserId>,
        actor_email: Option<String>,
        organization_id: Option<OrganizationId>,
    ) {
        let record = AuditRecord {
            action: event.action,
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            actor_id,
            actor_email,
            organization_id,
            details: event.details,
            success: event.success,
            error_reason: event.error_reason,
        };

        if let Err(failure) = self.trail.append(record) {
            tracing::debug!(action = %failure.entry.action, "continuing without audit entry");
        }
    }
}
