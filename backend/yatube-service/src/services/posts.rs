/// Post service - handles post listing, creation, updates and deletion
use actix_middleware::Requester;
use std::sync::Arc;
use validator::Validate;

use crate::db::{GroupRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{check_object_permission, Access};
use crate::models::{Post, PostInput, PostPatch, PostRecord, User, IMAGE_MAX_LEN};
use crate::pagination::LimitOffset;

/// A full list, or one window of it with the total count.
#[derive(Debug)]
pub enum Listing<T> {
    All(Vec<T>),
    Window {
        window: LimitOffset,
        count: i64,
        items: Vec<T>,
    },
}

#[derive(Clone)]
pub struct PostService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl PostService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            groups,
        }
    }

    pub async fn list(&self, window: Option<LimitOffset>) -> Result<Listing<Post>> {
        let items = self.posts.list_posts(window).await?;
        match window {
            None => Ok(Listing::All(items)),
            Some(window) => {
                let count = self.posts.count_posts().await?;
                Ok(Listing::Window {
                    window,
                    count,
                    items,
                })
            }
        }
    }

    pub async fn retrieve(&self, post_id: i64) -> Result<Post> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post"))
    }

    /// Create a post owned by `requester`.
    pub async fn create(&self, requester: &Requester, input: PostInput) -> Result<Post> {
        input.validate()?;
        let image = input.image.flatten();
        check_image(image.as_deref())?;
        let group_id = input.group.flatten();
        self.ensure_group(group_id).await?;
        self.users.upsert_user(&User::from(requester)).await?;

        let record = PostRecord {
            author_id: requester.id,
            text: input.text,
            image,
            group_id,
        };
        let post = self.posts.create_post(&record).await?;

        tracing::info!(post_id = post.id, author = %requester.username, "post created");
        Ok(post)
    }

    /// Apply `patch` to a post; fields absent from the patch keep their value.
    pub async fn update(&self, requester: &Requester, post_id: i64, patch: PostPatch) -> Result<Post> {
        let current = self.retrieve(post_id).await?;
        check_object_permission(Some(requester), Access::Write, &current)?;

        patch.validate()?;
        let image = patch.image.unwrap_or(current.image);
        check_image(image.as_deref())?;
        let group_id = patch.group.unwrap_or(current.group);
        if group_id != current.group {
            self.ensure_group(group_id).await?;
        }

        let record = PostRecord {
            author_id: current.author_id,
            text: patch.text.unwrap_or(current.text),
            image,
            group_id,
        };
        let post = self
            .posts
            .update_post(post_id, &record)
            .await?
            .ok_or_else(|| AppError::not_found("Post"))?;

        tracing::info!(post_id, author = %requester.username, "post updated");
        Ok(post)
    }

    pub async fn delete(&self, requester: &Requester, post_id: i64) -> Result<()> {
        let current = self.retrieve(post_id).await?;
        check_object_permission(Some(requester), Access::Write, &current)?;

        if !self.posts.delete_post(post_id).await? {
            return Err(AppError::not_found("Post"));
        }

        tracing::info!(post_id, author = %requester.username, "post deleted");
        Ok(())
    }

    async fn ensure_group(&self, group_id: Option<i64>) -> Result<()> {
        let Some(group_id) = group_id else {
            return Ok(());
        };
        match self.groups.get_group(group_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::invalid_field(
                "group",
                format!("Invalid pk \"{}\" - object does not exist.", group_id),
            )),
        }
    }
}

fn check_image(image: Option<&str>) -> Result<()> {
    match image {
        Some(value) if value.chars().count() > IMAGE_MAX_LEN => Err(AppError::invalid_field(
            "image",
            format!("Ensure this field has no more than {} characters.", IMAGE_MAX_LEN),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_image_length() {
        assert!(check_image(None).is_ok());
        assert!(check_image(Some("posts/cat.png")).is_ok());
        assert!(matches!(
            check_image(Some("x".repeat(IMAGE_MAX_LEN + 1).as_str())),
            Err(AppError::Validation { field: Some(f), .. }) if f == "image"
        ));
    }
}
