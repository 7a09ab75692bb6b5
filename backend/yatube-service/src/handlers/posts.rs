/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpRequest, HttpResponse};

use super::request_base_url;
use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::Requester;
use crate::models::{Post, PostInput, PostPatch};
use crate::pagination::{Page, PaginationParams};
use crate::services::Listing;

/// List posts
///
/// Returns a bare array, or the `{count, next, previous, results}` envelope
/// when a positive `limit` is given.
#[utoipa::path(
    get,
    path = "/api/v1/posts/",
    tag = "posts",
    params(
        ("limit" = Option<i64>, Query, description = "Page size; enables pagination"),
        ("offset" = Option<i64>, Query, description = "Items to skip")
    ),
    responses((status = 200, description = "Posts ordered by publication date", body = [Post]))
)]
pub async fn list_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match state.posts.list(query.resolve()).await? {
        Listing::All(posts) => Ok(HttpResponse::Ok().json(posts)),
        Listing::Window {
            window,
            count,
            items,
        } => {
            let page = Page::new(&request_base_url(&req), window, count, items);
            Ok(HttpResponse::Ok().json(page))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/",
    tag = "posts",
    request_body = PostInput,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_post(
    state: web::Data<AppState>,
    requester: Requester,
    payload: web::Json<PostInput>,
) -> Result<HttpResponse> {
    let post = state.posts.create(&requester, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(state: web::Data<AppState>, post_id: web::Path<i64>) -> Result<HttpResponse> {
    let post = state.posts.retrieve(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Replace a post (`text` required)
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostInput,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 403, description = "Requester is not the author"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_post(
    state: web::Data<AppState>,
    requester: Requester,
    post_id: web::Path<i64>,
    payload: web::Json<PostInput>,
) -> Result<HttpResponse> {
    let patch = PostPatch::from(payload.into_inner());
    let post = state
        .posts
        .update(&requester, post_id.into_inner(), patch)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostPatch,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 403, description = "Requester is not the author"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn partial_update_post(
    state: web::Data<AppState>,
    requester: Requester,
    post_id: web::Path<i64>,
    payload: web::Json<PostPatch>,
) -> Result<HttpResponse> {
    let post = state
        .posts
        .update(&requester, post_id.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/",
    tag = "posts",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Requester is not the author"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_post(
    state: web::Data<AppState>,
    requester: Requester,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    state.posts.delete(&requester, post_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
