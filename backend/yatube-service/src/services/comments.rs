/// Comment service - comments are always scoped to an existing post
use actix_middleware::Requester;
use std::sync::Arc;
use validator::Validate;

use crate::db::{CommentRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{check_object_permission, Access};
use crate::models::{Comment, CommentInput, CommentPatch, CommentRecord, User};

#[derive(Clone)]
pub struct CommentService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    pub async fn ensure_post(&self, post_id: i64) -> Result<()> {
        if self.posts.post_exists(post_id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Post"))
        }
    }

    pub async fn list(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.ensure_post(post_id).await?;
        self.comments.list_comments(post_id).await
    }

    pub async fn retrieve(&self, post_id: i64, comment_id: i64) -> Result<Comment> {
        self.ensure_post(post_id).await?;
        self.comments
            .get_comment(post_id, comment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))
    }

    /// Author and post come from the requester and the route, never the body.
    pub async fn create(
        &self,
        requester: &Requester,
        post_id: i64,
        input: CommentInput,
    ) -> Result<Comment> {
        self.ensure_post(post_id).await?;
        input.validate()?;
        self.users.upsert_user(&User::from(requester)).await?;

        let record = CommentRecord {
            author_id: requester.id,
            post_id,
            text: input.text,
        };
        let comment = self.comments.create_comment(&record).await?;

        tracing::info!(
            post_id,
            comment_id = comment.id,
            author = %requester.username,
            "comment created"
        );
        Ok(comment)
    }

    pub async fn update(
        &self,
        requester: &Requester,
        post_id: i64,
        comment_id: i64,
        patch: CommentPatch,
    ) -> Result<Comment> {
        let current = self.retrieve(post_id, comment_id).await?;
        check_object_permission(Some(requester), Access::Write, &current)?;
        patch.validate()?;

        let text = patch.text.unwrap_or(current.text);
        self.comments
            .update_comment(post_id, comment_id, &text)
            .await?
            .ok_or_else(|| AppError::not_found("Comment"))
    }

    pub async fn delete(&self, requester: &Requester, post_id: i64, comment_id: i64) -> Result<()> {
        let current = self.retrieve(post_id, comment_id).await?;
        check_object_permission(Some(requester), Access::Write, &current)?;

        if !self.comments.delete_comment(post_id, comment_id).await? {
            return Err(AppError::not_found("Comment"));
        }

        tracing::info!(post_id, comment_id, author = %requester.username, "comment deleted");
        Ok(())
    }
}
