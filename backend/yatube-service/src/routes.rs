/// Route table for the `/api/v1` API
///
/// Paths are registered without a trailing slash; the app is expected to be
/// wrapped in `NormalizePath::trim()` so both spellings resolve.
use actix_web::dev::HttpServiceFactory;
use actix_web::{web, HttpRequest};
use std::sync::Arc;

use crate::error::AppError;
use crate::handlers;
use crate::middleware::{get_correlation_id, JwtAuthMiddleware, JwtValidator};
use crate::services::groups::GROUP_METHODS;

const COLLECTION_METHODS: &str = "GET, POST";
const ITEM_METHODS: &str = "GET, PUT, PATCH, DELETE";

/// 405 responder advertising `allowed`.
fn not_allowed(allowed: &'static str) -> actix_web::Route {
    web::to(move |req: HttpRequest| handlers::method_not_allowed(req, allowed))
}

/// Malformed or mistyped JSON bodies become validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req: &HttpRequest| {
        tracing::debug!(
            path = %req.path(),
            correlation_id = ?get_correlation_id(req),
            error = %err,
            "rejected request body"
        );
        AppError::from(err).into()
    })
}

/// The authenticated API scope with every resource route.
pub fn api_scope(validator: Arc<JwtValidator>) -> impl HttpServiceFactory {
    web::scope("/api/v1")
        .wrap(JwtAuthMiddleware::new(validator))
        .app_data(json_config())
        .configure(configure_routes)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(handlers::list_posts))
            .route(web::post().to(handlers::create_post))
            .default_service(not_allowed(COLLECTION_METHODS)),
    )
    .service(
        web::resource("/posts/{id}")
            .route(web::get().to(handlers::get_post))
            .route(web::put().to(handlers::update_post))
            .route(web::patch().to(handlers::partial_update_post))
            .route(web::delete().to(handlers::delete_post))
            .default_service(not_allowed(ITEM_METHODS)),
    )
    .service(
        web::resource("/posts/{post_id}/comments")
            .route(web::get().to(handlers::list_comments))
            .route(web::post().to(handlers::create_comment))
            .default_service(not_allowed(COLLECTION_METHODS)),
    )
    .service(
        web::resource("/posts/{post_id}/comments/{id}")
            .route(web::get().to(handlers::get_comment))
            .route(web::put().to(handlers::update_comment))
            .route(web::patch().to(handlers::partial_update_comment))
            .route(web::delete().to(handlers::delete_comment))
            .default_service(not_allowed(ITEM_METHODS)),
    )
    .service(
        web::resource("/groups")
            .route(web::get().to(handlers::list_groups))
            .route(web::post().to(handlers::reject_group_write))
            .default_service(not_allowed(GROUP_METHODS)),
    )
    .service(
        web::resource("/groups/{id}")
            .route(web::get().to(handlers::get_group))
            .route(web::put().to(handlers::reject_group_write))
            .route(web::patch().to(handlers::reject_group_write))
            .route(web::delete().to(handlers::reject_group_write))
            .default_service(not_allowed(GROUP_METHODS)),
    )
    .service(
        web::resource("/follow")
            .route(web::get().to(handlers::list_follows))
            .route(web::post().to(handlers::create_follow))
            .default_service(not_allowed(COLLECTION_METHODS)),
    );
}
