/// Shared application state handed to every handler
use crate::db::Repositories;
use crate::services::{CommentService, FollowService, GroupService, PostService};

#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub groups: GroupService,
    pub comments: CommentService,
    pub follows: FollowService,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self {
        Self {
            posts: PostService::new(repos.users.clone(), repos.posts.clone(), repos.groups.clone()),
            groups: GroupService::new(repos.groups.clone()),
            comments: CommentService::new(
                repos.users.clone(),
                repos.posts.clone(),
                repos.comments.clone(),
            ),
            follows: FollowService::new(repos.users, repos.follows),
        }
    }
}
