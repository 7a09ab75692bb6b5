//! # Actix Middleware Library
//!
//! Shared middleware components for Yatube Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer token validation and the `Requester` extractor
//! - `correlation_id`: `X-Correlation-ID` propagation
//! - `metrics`: Prometheus metrics middleware and `/metrics` handler

pub mod correlation_id;
pub mod jwt_auth;
pub mod metrics;

pub use correlation_id::{get_correlation_id, CorrelationId, CorrelationIdMiddleware};
pub use jwt_auth::{AuthError, Claims, JwtAuthMiddleware, JwtValidator, Requester};
pub use metrics::{serve_metrics, MetricsMiddleware};
