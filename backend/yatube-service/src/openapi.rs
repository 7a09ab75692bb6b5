/// OpenAPI documentation for the Yatube API
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers::{comments, follows, groups, posts};
use crate::models::{
    Comment, CommentInput, CommentPatch, Follow, FollowInput, Group, Post, PostInput, PostPatch,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Yatube API",
        version = "1.0.0",
        description = "Blog API: posts, groups, comments and author subscriptions. Reads are public; writes require a bearer token from the identity provider.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Development server"),
    ),
    paths(
        posts::list_posts,
        posts::create_post,
        posts::get_post,
        posts::update_post,
        posts::partial_update_post,
        posts::delete_post,
        groups::list_groups,
        groups::get_group,
        comments::list_comments,
        comments::create_comment,
        comments::get_comment,
        comments::update_comment,
        comments::partial_update_comment,
        comments::delete_comment,
        follows::list_follows,
        follows::create_follow,
    ),
    components(schemas(
        Post,
        PostInput,
        PostPatch,
        Group,
        Comment,
        CommentInput,
        CommentPatch,
        Follow,
        FollowInput,
    )),
    tags(
        (name = "posts", description = "Publications"),
        (name = "groups", description = "Communities, read-only"),
        (name = "comments", description = "Comments under a post"),
        (name = "follow", description = "Subscriptions of the requester"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("RS256 access token from the identity provider"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
