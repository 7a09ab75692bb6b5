/// Group handlers - groups are read-only over HTTP
use actix_web::{web, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::error::Result;
use crate::models::Group;

#[utoipa::path(
    get,
    path = "/api/v1/groups/",
    tag = "groups",
    responses((status = 200, description = "All groups", body = [Group]))
)]
pub async fn list_groups(state: web::Data<AppState>) -> Result<HttpResponse> {
    let groups = state.groups.list().await?;
    Ok(HttpResponse::Ok().json(groups))
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/",
    tag = "groups",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group", body = Group),
        (status = 404, description = "Group not found")
    )
)]
pub async fn get_group(state: web::Data<AppState>, group_id: web::Path<i64>) -> Result<HttpResponse> {
    let group = state.groups.retrieve(group_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(group))
}

/// POST, PUT, PATCH and DELETE on groups. The body is never read.
pub async fn reject_group_write(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    Err(state.groups.reject_write(req.method().as_str()))
}
