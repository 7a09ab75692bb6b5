/// Follow handlers - the requester's subscriptions
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::Requester;
use crate::models::{Follow, FollowInput};

#[derive(Debug, Default, Deserialize)]
pub struct FollowSearchParams {
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/follow/",
    tag = "follow",
    params(("search" = Option<String>, Query, description = "Terms matched against follower and author usernames")),
    responses(
        (status = 200, description = "Subscriptions of the requester", body = [Follow]),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_follows(
    state: web::Data<AppState>,
    requester: Requester,
    query: web::Query<FollowSearchParams>,
) -> Result<HttpResponse> {
    let follows = state
        .follows
        .list(&requester, query.search.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(follows))
}

#[utoipa::path(
    post,
    path = "/api/v1/follow/",
    tag = "follow",
    request_body = FollowInput,
    responses(
        (status = 201, description = "Subscription created", body = Follow),
        (status = 400, description = "Self or duplicate subscription"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_follow(
    state: web::Data<AppState>,
    requester: Requester,
    payload: web::Json<FollowInput>,
) -> Result<HttpResponse> {
    let follow = state.follows.create(&requester, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(follow))
}
