//! `taskhub-access` — the single entry point request handlers call.
//!
//! Handlers ask [`AuthorizationFacade::authorize`] before acting and
//! [`AuthorizationFacade::record`] afterwards, or let [`RouteGuard::run`] do both.

pub mod facade;
pub mod guard;
pub mod routes;

pub use facade::{AuditEvent, AuthorizationFacade};
pub use guard::{GuardError, RouteGuard, RouteRequest};
pub use routes::{RoutePolicy, RouteTable};
