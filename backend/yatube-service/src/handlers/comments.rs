/// Comment handlers - HTTP endpoints for comments under a post
use actix_web::{web, HttpResponse};

use super::parse_json;
use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::Requester;
use crate::models::{Comment, CommentInput, CommentPatch};

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments/",
    tag = "comments",
    params(("post_id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Comments of the post", body = [Comment]),
        (status = 404, description = "Post not found")
    )
)]
pub async fn list_comments(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let comments = state.comments.list(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments/",
    tag = "comments",
    params(("post_id" = i64, Path, description = "Post id")),
    request_body = CommentInput,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    state: web::Data<AppState>,
    requester: Requester,
    post_id: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    // A missing post is 404 whatever the payload, so look it up before parsing.
    state.comments.ensure_post(post_id).await?;
    let input: CommentInput = parse_json(&body)?;

    let comment = state.comments.create(&requester, post_id, input).await?;
    Ok(HttpResponse::Created().json(comment))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment", body = Comment),
        (status = 404, description = "Post or comment not found")
    )
)]
pub async fn get_comment(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state.comments.retrieve(post_id, comment_id).await?;
    Ok(HttpResponse::Ok().json(comment))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentInput,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 403, description = "Requester is not the author"),
        (status = 404, description = "Post or comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_comment(
    state: web::Data<AppState>,
    requester: Requester,
    path: web::Path<(i64, i64)>,
    payload: web::Json<CommentInput>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let patch = CommentPatch {
        text: Some(payload.into_inner().text),
    };
    let comment = state
        .comments
        .update(&requester, post_id, comment_id, patch)
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    request_body = CommentPatch,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 403, description = "Requester is not the author"),
        (status = 404, description = "Post or comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn partial_update_comment(
    state: web::Data<AppState>,
    requester: Requester,
    path: web::Path<(i64, i64)>,
    payload: web::Json<CommentPatch>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .update(&requester, post_id, comment_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}/comments/{id}/",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Post id"),
        ("id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Requester is not the author"),
        (status = 404, description = "Post or comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    state: web::Data<AppState>,
    requester: Requester,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state.comments.delete(&requester, post_id, comment_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
