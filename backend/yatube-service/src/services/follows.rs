/// Follow service - subscriptions of the requester to other authors
use actix_middleware::Requester;
use std::sync::Arc;
use validator::Validate;

use crate::db::{FollowRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{
    Follow, FollowInput, FollowScope, User, DUPLICATE_FOLLOW_MESSAGE, SELF_FOLLOW_MESSAGE,
};

#[derive(Clone)]
pub struct FollowService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    /// Rows the requester may read: only their own subscriptions.
    pub fn scope_for(requester: &Requester) -> FollowScope {
        FollowScope::Follower(requester.id)
    }

    pub async fn list(&self, requester: &Requester, search: Option<&str>) -> Result<Vec<Follow>> {
        let scope = Self::scope_for(requester);
        let terms = search_terms(search.unwrap_or_default());
        self.follows.list_follows(scope, &terms).await
    }

    /// Subscribe the requester to `input.author`.
    pub async fn create(&self, requester: &Requester, input: FollowInput) -> Result<Follow> {
        input.validate()?;
        // Mirror the requester first so a self-follow resolves to their own row.
        self.users.upsert_user(&User::from(requester)).await?;

        let author = self
            .users
            .find_by_username(input.author.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if author.id == requester.id {
            return Err(AppError::invalid_field("author", SELF_FOLLOW_MESSAGE));
        }
        if self.follows.follow_exists(requester.id, author.id).await? {
            return Err(AppError::invalid_field("author", DUPLICATE_FOLLOW_MESSAGE));
        }

        let follow = self.follows.create_follow(requester.id, author.id).await?;
        tracing::info!(
            follower = %requester.username,
            author = %author.username,
            "follow created"
        );
        Ok(follow)
    }
}

/// Split a search string on whitespace and commas.
pub fn search_terms(search: &str) -> Vec<String> {
    search
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
