/// Yatube Service Library
///
/// Blog API with posts, groups, comments and author subscriptions.
/// Identity is owned by an external provider; this service validates its
/// bearer tokens and enforces author-or-read-only access.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `routes`: `/api/v1` route table
/// - `services`: Business logic, each call taking the requester explicitly
/// - `db`: Repository traits and the PostgreSQL store
/// - `models`: Rows and input types
/// - `pagination`: Opt-in limit/offset pagination
/// - `middleware`: Object-level access policy and shared HTTP middleware
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `cli`: Command line entry points
pub mod app_state;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod routes;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use error::{AppError, Result};
