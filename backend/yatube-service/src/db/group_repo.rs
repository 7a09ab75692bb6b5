use async_trait::async_trait;

use super::{violated_constraint, GroupRepository, PgStore};
use crate::error::{AppError, Result};
use crate::models::{Group, NewGroup};

#[async_trait]
impl GroupRepository for PgStore {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(groups)
    }

    async fn get_group(&self, id: i64) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(group)
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (title, slug, description)
            VALUES ($1, $2, $3)
            RETURNING id, title, slug, description
            "#,
        )
        .bind(&group.title)
        .bind(&group.slug)
        .bind(&group.description)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("groups_slug_key") => {
                AppError::invalid_field("slug", "group with this slug already exists.")
            }
            _ => AppError::from(e),
        })
    }
}
