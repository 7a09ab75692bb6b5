/// HTTP middleware utilities for yatube-service
///
/// Authentication, correlation ids and request metrics live in the shared
/// `actix-middleware` crate; this module holds the object-level access policy.
pub mod permissions;

pub use actix_middleware::{
    get_correlation_id, CorrelationIdMiddleware, JwtAuthMiddleware, JwtValidator,
    MetricsMiddleware, Requester,
};
pub use permissions::{check_object_permission, Access, Authored};
