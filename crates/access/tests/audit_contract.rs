//! Cross-crate scenarios: decisions, guarded routes and the audit obligation.

use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};
use thiserror::Error;

use taskhub_access::{AuditEvent, AuthorizationFacade, GuardError, RouteGuard, RouteRequest, RouteTable};
use taskhub_audit::{
    AuditAction, AuditFilter, AuditStoreError, AuditTrail, InMemoryAuditLog, Pagination,
    RecordingFailureReporter,
};
use taskhub_auth::permissions::task;
use taskhub_auth::{AccessDecision, Decision, DenyReason, Principal, ResourceDescriptor, Role, VerifiedClaims};
use taskhub_core::{ManualClock, OrganizationId, UserId};
use taskhub_orgs::{InMemoryOrganizationStore, Organization, OrganizationGraph};

#[derive(Debug, Error)]
#[error("task store rejected the write")]
struct TaskStoreError;

struct World {
    guard: RouteGuard,
    facade: Arc<AuthorizationFacade>,
    log: Arc<InMemoryAuditLog>,
    reporter: Arc<RecordingFailureReporter>,
    acme: OrganizationId,
    engineering: OrganizationId,
    marketing: OrganizationId,
}

fn world() -> World {
    let orgs = InMemoryOrganizationStore::new();
    let acme = OrganizationId::new();
    let engineering = OrganizationId::new();
    let marketing = OrganizationId::new();
    orgs.insert(Organization::root(acme, "Acme"));
    orgs.insert(Organization::child(engineering, "Engineering", acme));
    orgs.insert(Organization::child(marketing, "Marketing", acme));

    let log = Arc::new(InMemoryAuditLog::new());
    let reporter = Arc::new(RecordingFailureReporter::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()));
    let decision = AccessDecision::new(OrganizationGraph::new(Arc::new(orgs)));
    let trail = AuditTrail::new(log.clone(), decision)
        .with_reporter(reporter.clone())
        .with_clock(clock);
    let facade = Arc::new(AuthorizationFacade::new(trail));

    World {
        guard: RouteGuard::new(facade.clone(), RouteTable::standard()),
        facade,
        log,
        reporter,
        acme,
        engineering,
        marketing,
    }
}

fn principal(role: Role, org: OrganizationId, email: &str) -> Principal {
    Principal::new(UserId::new(), email, role, org)
}

#[test]
fn engineering_admin_cannot_touch_acme_records() {
    taskhub_observability::init();
    let w = world();
    let admin = principal(Role::Admin, w.engineering, "admin@engineering");

    assert_eq!(
        w.facade.authorize(&admin, &task::DELETE, Some(&ResourceDescriptor::in_organization(w.acme))),
        Decision::Deny(DenyReason::OutOfScope)
    );
    assert_eq!(
        w.facade.authorize(&admin, &task::DELETE, Some(&ResourceDescriptor::in_organization(w.engineering))),
        Decision::Allow
    );
}

#[test]
fn failed_login_for_unknown_email_writes_one_anonymous_entry() {
    let w = world();
    w.facade.record_login_failed("nobody@nowhere.test", "invalid_credentials");

    let entries = w.log.snapshot();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.action, AuditAction::LOGIN_FAILED);
    assert!(!entry.success);
    assert_eq!(entry.actor_id, None);
    assert_eq!(entry.actor_email.as_deref(), Some("nobody@nowhere.test"));
    assert_eq!(entry.organization_id, None);
}

#[test]
fn failed_login_and_recorded_event_share_the_failure_path() {
    let w = world();
    w.log.set_available(false);

    w.facade.record_login_failed("nobody@nowhere.test", "invalid_credentials");
    w.facade.record(
        Some(&principal(Role::Admin, w.acme, "admin@acme")),
        AuditEvent::succeeded(AuditAction::TASK_CREATE, "task"),
    );

    let failures = w.reporter.failures();
    assert_eq!(failures.len(), 2);
    let login = &failures[0].entry;
    assert_eq!(login.action, AuditAction::LOGIN_FAILED);
    assert_eq!(login.actor_email.as_deref(), Some("nobody@nowhere.test"));
    assert_eq!(login.error_reason.as_deref(), Some("invalid_credentials"));
    assert_eq!(login.resource_type, "auth");
    assert_eq!(failures[1].entry.action, AuditAction::TASK_CREATE);
    assert_eq!(failures[1].entry.organization_id, Some(w.acme));

    w.log.set_available(true);
    w.facade.record_login_failed("nobody@nowhere.test", "invalid_credentials");
    assert_eq!(w.log.snapshot()[0].error_reason.as_deref(), Some("invalid_credentials"));
}

#[test]
fn failed_logins_view_is_owner_only() {
    let w = world();
    w.facade.record_login_failed("a@x.test", "invalid_credentials");
    w.facade.record_login_failed("b@x.test", "invalid_credentials");
    w.facade.record_login_succeeded(&principal(Role::Viewer, w.marketing, "c@x.test"));

    let owner = principal(Role::Owner, w.marketing, "owner@acme");
    let page = w.facade.audit().failed_logins(&owner, Pagination::default()).unwrap();
    assert_eq!(page.total, 2);

    let admin = principal(Role::Admin, w.acme, "admin@acme");
    assert!(w.facade.audit().failed_logins(&admin, Pagination::default()).is_err());
}

#[test]
fn every_guarded_attempt_is_recorded_exactly_once() {
    let w = world();
    let roles = [Role::Owner, Role::Admin, Role::Viewer];
    let orgs = [w.acme, w.engineering, w.marketing];
    let table = RouteTable::standard();

    for role in roles {
        for home in orgs {
            let actor = principal(role, home, "actor@acme");
            for (route, policy) in table.routes() {
                for target in orgs {
                    for owned in [true, false] {
                        let resource = ResourceDescriptor {
                            owner_id: owned.then_some(actor.id),
                            organization_id: target,
                        };
                        let before = w.log.len();
                        let mut ran = false;

                        let result: Result<(), GuardError<TaskStoreError>> = w.guard.run(
                            &actor,
                            RouteRequest::new(route).on(resource).with_resource_id("r-1"),
                            || {
                                ran = true;
                                Ok(())
                            },
                        );

                        assert_eq!(w.log.len(), before + 1, "{role} {route}");
                        let last = w.log.snapshot().pop().unwrap();
                        assert_eq!(last.actor_id, Some(actor.id));

                        let below_min_role = policy.min_role.is_some_and(|min| !role.is_at_least(min));
                        if below_min_role {
                            assert!(result.is_err(), "{role} passed {route}");
                        }

                        match result {
                            Ok(()) => {
                                assert!(ran);
                                assert!(last.success);
                            }
                            Err(err) => {
                                assert!(!ran, "operation ran despite denial");
                                assert!(!last.success);
                                let reason = err.deny_reason().unwrap();
                                assert_eq!(last.error_reason.as_deref(), Some(reason.code()));
                                assert_eq!(err.public_message(), "forbidden");
                            }
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn admin_is_turned_away_from_failed_logins_route() {
    let w = world();
    let admin = principal(Role::Admin, w.acme, "admin@acme");
    let mut ran = false;

    let result: Result<(), GuardError<TaskStoreError>> =
        w.guard.run(&admin, RouteRequest::new("audit.failed_logins"), || {
            ran = true;
            Ok(())
        });

    assert!(matches!(result, Err(GuardError::Forbidden(DenyReason::InsufficientRole))));
    assert!(!ran);
    let entries = w.log.snapshot();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].error_reason.as_deref(), Some("insufficient_role"));

    let owner = principal(Role::Owner, w.engineering, "owner@acme");
    let result: Result<(), GuardError<TaskStoreError>> =
        w.guard.run(&owner, RouteRequest::new("audit.failed_logins"), || Ok(()));
    assert!(result.is_ok());
}

#[test]
fn operation_failures_are_recorded_as_unsuccessful() {
    let w = world();
    let admin = principal(Role::Admin, w.engineering, "admin@engineering");

    let result: Result<(), _> = w.guard.run(
        &admin,
        RouteRequest::new("tasks.update").on(ResourceDescriptor::in_organization(w.engineering)),
        || Err(TaskStoreError),
    );

    assert!(matches!(result, Err(GuardError::Failed(TaskStoreError))));
    let entries = w.log.snapshot();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].error_reason.as_deref(), Some("task store rejected the write"));
}

#[test]
fn unknown_routes_are_denied_and_recorded() {
    let w = world();
    let owner = principal(Role::Owner, w.acme, "owner@acme");

    let result: Result<(), GuardError<TaskStoreError>> =
        w.guard.run(&owner, RouteRequest::new("tasks.export"), || Ok(()));

    assert!(matches!(result, Err(GuardError::UnknownRoute(ref r)) if r == "tasks.export"));
    let entries = w.log.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AuditAction::ACCESS_DENIED);
    assert_eq!(entries[0].error_reason.as_deref(), Some("unknown_route"));
}

#[test]
fn audit_outage_does_not_block_the_primary_action() {
    let w = world();
    w.log.set_available(false);
    let admin = principal(Role::Admin, w.acme, "admin@acme");

    let created = w.guard.run(
        &admin,
        RouteRequest::new("tasks.create").on(ResourceDescriptor::in_organization(w.engineering)),
        || Ok::<_, TaskStoreError>("task-7"),
    );

    assert_eq!(created.unwrap(), "task-7");
    assert_eq!(w.reporter.failures().len(), 1);
    assert!(w.log.is_empty());
}

#[test]
fn audit_timeout_is_reported_and_the_action_still_completes() {
    let w = world();
    w.log.set_failure(Some(AuditStoreError::Timeout));
    let admin = principal(Role::Admin, w.acme, "admin@acme");

    let updated = w.guard.run(
        &admin,
        RouteRequest::new("tasks.update").on(ResourceDescriptor::in_organization(w.marketing)),
        || Ok::<_, TaskStoreError>(3_u32),
    );

    assert_eq!(updated.unwrap(), 3);
    let failures = w.reporter.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].source, AuditStoreError::Timeout);
    assert_eq!(failures[0].entry.action, AuditAction::TASK_UPDATE);
    assert!(w.log.is_empty());

    w.log.set_failure(None);
    let denied: Result<(), GuardError<TaskStoreError>> =
        w.guard.run(&principal(Role::Viewer, w.acme, "viewer@acme"), RouteRequest::new("tasks.delete"), || Ok(()));
    assert!(denied.is_err());
    assert_eq!(w.log.len(), 1);
}

#[test]
fn record_fills_actor_fields_from_principal() {
    let w = world();
    let viewer = principal(Role::Viewer, w.marketing, "viewer@marketing");
    w.facade.record(
        Some(&viewer),
        AuditEvent::succeeded(AuditAction::TASK_READ, "task")
            .with_resource_id("t-9")
            .with_details(serde_json::json!({ "fields": ["title"] })),
    );

    let entry = w.log.snapshot().pop().unwrap();
    assert_eq!(entry.actor_id, Some(viewer.id));
    assert_eq!(entry.actor_email.as_deref(), Some("viewer@marketing"));
    assert_eq!(entry.organization_id, Some(w.marketing));
    assert_eq!(entry.resource_id.as_deref(), Some("t-9"));
}

#[test]
fn scoped_audit_reads_follow_the_hierarchy() {
    let w = world();
    for (org, email) in [
        (w.acme, "a@acme"),
        (w.engineering, "e@acme"),
        (w.marketing, "m@acme"),
    ] {
        let actor = principal(Role::Admin, org, email);
        w.facade.record(Some(&actor), AuditEvent::succeeded(AuditAction::TASK_CREATE, "task"));
    }

    let root_admin = principal(Role::Admin, w.acme, "root@acme");
    let eng_admin = principal(Role::Admin, w.engineering, "eng@acme");
    let all = AuditFilter::default();

    assert_eq!(w.facade.audit().query(&root_admin, &all, Pagination::default()).unwrap().total, 3);
    let eng_page = w.facade.audit().query(&eng_admin, &all, Pagination::default()).unwrap();
    assert_eq!(eng_page.total, 1);
    assert_eq!(eng_page.entries[0].actor_email.as_deref(), Some("e@acme"));
}

#[test]
fn principals_are_decoded_from_verified_claims() {
    let w = world();
    let claims = VerifiedClaims {
        sub: UserId::new(),
        email: "owner@acme".to_string(),
        role: "OWNER".to_string(),
        organization_id: w.engineering,
    };
    let owner = Principal::try_from(claims).unwrap();
    assert_eq!(
        w.facade.authorize(&owner, &task::DELETE, Some(&ResourceDescriptor::in_organization(w.acme))),
        Decision::Allow
    );

    let forged = VerifiedClaims {
        sub: UserId::new(),
        email: "x@acme".to_string(),
        role: "god".to_string(),
        organization_id: w.acme,
    };
    assert!(Principal::try_from(forged).is_err());
}

#[test]
fn concurrent_records_are_all_kept() -> anyhow::Result<()> {
    let w = world();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let facade = w.facade.clone();
            let org = w.engineering;
            thread::spawn(move || {
                let actor = Principal::new(UserId::new(), format!("worker{i}@acme"), Role::Admin, org);
                for _ in 0..25 {
                    facade.record(Some(&actor), AuditEvent::succeeded(AuditAction::TASK_UPDATE, "task"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().map_err(|_| anyhow::anyhow!("recording thread panicked"))?;
    }

    assert_eq!(w.log.len(), 200);
    Ok(())
}
