/// Group service - groups are read-only over HTTP
use std::sync::Arc;
use validator::Validate;

use crate::db::GroupRepository;
use crate::error::{AppError, Result};
use crate::models::{Group, NewGroup};

/// Methods the group resources accept.
pub const GROUP_METHODS: &str = "GET";

#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn list(&self) -> Result<Vec<Group>> {
        self.groups.list_groups().await
    }

    pub async fn retrieve(&self, group_id: i64) -> Result<Group> {
        self.groups
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group"))
    }

    /// Create, update, partial update and delete are never allowed through
    /// the API, whoever asks and whatever the payload.
    pub fn reject_write(&self, method: &str) -> AppError {
        tracing::debug!(%method, "group write rejected");
        AppError::method_not_allowed(method, GROUP_METHODS)
    }

    /// Out-of-band creation used by the administrative command.
    pub async fn create_admin(&self, group: NewGroup) -> Result<Group> {
        group.validate()?;
        let created = self.groups.create_group(&group).await?;
        tracing::info!(group_id = created.id, slug = %created.slug, "group created");
        Ok(created)
    }
}
