/// HTTP handlers for yatube-service
///
/// - Posts: list (optionally paginated), create, read, update, delete
/// - Groups: read-only listing and lookup
/// - Comments: CRUD scoped under a post
/// - Follows: the requester's subscriptions, with search
/// - Health: store ping and liveness
pub mod comments;
pub mod follows;
pub mod groups;
pub mod health;
pub mod posts;

use actix_web::{HttpRequest, HttpResponse};

use crate::error::{AppError, Result};

pub use comments::{
    create_comment, delete_comment, get_comment, list_comments, partial_update_comment,
    update_comment,
};
pub use follows::{create_follow, list_follows};
pub use groups::{get_group, list_groups, reject_group_write};
pub use health::{health_summary, liveness_check, HealthState};
pub use posts::{create_post, delete_post, get_post, list_posts, partial_update_post, update_post};

/// Fallback for methods a resource does not route; `allowed` lists the
/// methods it does.
pub async fn method_not_allowed(req: HttpRequest, allowed: &'static str) -> Result<HttpResponse> {
    Err(AppError::method_not_allowed(req.method().as_str(), allowed))
}

/// Deserialize a JSON body read as raw bytes.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {}", e)))
}

/// Absolute URL of the current request without its query string.
pub(crate) fn request_base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), req.path())
}
