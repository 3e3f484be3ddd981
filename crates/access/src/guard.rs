//! Route interceptor: authorize, run, and record exactly once.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use taskhub_audit::AuditAction;
use taskhub_auth::{Decision, DenyReason, Principal, ResourceDescriptor, model};

use crate::facade::{AuditEvent, AuthorizationFacade};
use crate::routes::RouteTable;

#[derive(Debug, Error)]
pub enum GuardError<E> {
    #[error("forbidden")]
    Forbidden(DenyReason),

    #[error("forbidden")]
    UnknownRoute(String),

    #[error("operation failed: {0}")]
    Failed(#[source] E),
}

impl<E> GuardError<E> {
    /// Message safe to show end users. Deny reasons are never exposed.
    pub fn public_message(&self) -> &'static str {
        match self {
            GuardError::Forbidden(_) | GuardError::UnknownRoute(_) => "forbidden",
            GuardError::Failed(_) => "operation failed",
        }
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            GuardError::Forbidden(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// One guarded request.
#[derive(Debug, Clone)]
pub struct RouteRequest<'a> {
    pub route: &'a str,
    pub resource: Option<ResourceDescriptor>,
    pub resource_id: Option<String>,
    pub details: JsonValue,
}

impl<'a> RouteRequest<'a> {
    pub fn new(route: &'a str) -> Self {
        Self {
            route,
            resource: None,
            resource_id: None,
            details: JsonValue::Null,
        }
    }

    pub fn on(mut self, resource: ResourceDescriptor) -> Self {
        self.resource = Some(resource);
        self
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

/// Interceptor that consults the [`RouteTable`] and the facade for every request.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    facade: Arc<AuthorizationFacade>,
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(facade: Arc<AuthorizationFacade>, table: RouteTable) -> Self {
        Self { facade, table }
    }

    pub fn facade(&self) -> &AuthorizationFacade {
        &self.facade
    }

    /// Authorize `request`, run `op` only on allow, and record one audit entry
    /// for the attempt whatever the outcome.
    pub fn run<T, E, F>(&self, principal: &Principal, request: RouteRequest<'_>, op: F) -> Result<T, GuardError<E>>
    where
        F: FnOnce() -> Result<T, E>,
        E: core::fmt::Display,
    {
        let Some(policy) = self.table.policy(request.route) else {
            tracing::warn!(route = request.route, principal_id = %principal.id, "unregistered route denied");
            let event = AuditEvent::failed(AuditAction::ACCESS_DENIED, "route", "unknown_route")
                .with_resource_id(request.route)
                .with_details(request.details);
            self.facade.record(Some(principal), event);
            return Err(GuardError::UnknownRoute(request.route.to_string()));
        };

        let below_min_role = policy
            .min_role
            .is_some_and(|required| !model::is_at_least(principal.role, required));

        let denied = if below_min_role {
            tracing::info!(
                route = request.route,
                principal_id = %principal.id,
                role = %principal.role,
                required = ?policy.min_role,
                "route requires a higher role"
            );
            Some(DenyReason::InsufficientRole)
        } else {
            policy.permissions.iter().find_map(|permission| {
                match self.facade.authorize(principal, permission, request.resource.as_ref()) {
                    Decision::Allow => None,
                    Decision::Deny(reason) => Some(reason),
                }
            })
        };

        let event = |success: bool, error_reason: Option<String>| AuditEvent {
            action: policy.action.clone(),
            resource_type: policy.resource_type.to_string(),
            resource_id: request.resource_id.clone(),
            success,
            details: request.details.clone(),
            error_reason,
        };

        if let Some(reason) = denied {
            self.facade
                .record(Some(principal), event(false, Some(reason.code().to_string())));
            return Err(GuardError::Forbidden(reason));
        }

        match op() {
            Ok(value) => {
                self.facade.record(Some(principal), event(true, None));
                Ok(value)
            }
            Err(e) => {
                self.facade.record(Some(principal), event(false, Some(e.to_string())));
                Err(GuardError::Failed(e))
            }
        }
    }
}
