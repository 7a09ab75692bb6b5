use async_trait::async_trait;
use sqlx::Row;

use super::{violated_constraint, PgStore, PostRepository};
use crate::error::{AppError, Result};
use crate::models::{Post, PostRecord};
use crate::pagination::LimitOffset;

/// Projection shared by every post query; `src` is the posts row alias.
macro_rules! post_columns {
    () => {
        r#"src.id, src.text, src.pub_date, u.username AS author, src.image,
           src.group_id AS "group", src.author_id"#
    };
}

fn map_write_error(err: sqlx::Error) -> AppError {
    match violated_constraint(&err) {
        Some("posts_group_id_fkey") => {
            AppError::invalid_field("group", "Invalid pk - object does not exist.")
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl PostRepository for PgStore {
    async fn count_posts(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
            .fetch_one(self.pool())
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    async fn list_posts(&self, window: Option<LimitOffset>) -> Result<Vec<Post>> {
        // LIMIT NULL is LIMIT ALL in PostgreSQL.
        let posts = sqlx::query_as::<_, Post>(concat!(
            "SELECT ",
            post_columns!(),
            r#"
            FROM posts src
            JOIN users u ON u.id = src.author_id
            ORDER BY src.pub_date, src.id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(window.map(|w| w.limit))
        .bind(window.map(|w| w.offset).unwrap_or(0))
        .fetch_all(self.pool())
        .await?;

        Ok(posts)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(concat!(
            "SELECT ",
            post_columns!(),
            r#"
            FROM posts src
            JOIN users u ON u.id = src.author_id
            WHERE src.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(post)
    }

    async fn post_exists(&self, id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1) AS found")
            .bind(id)
            .fetch_one(self.pool())
            .await?;

        Ok(row.get::<bool, _>("found"))
    }

    async fn create_post(&self, record: &PostRecord) -> Result<Post> {
        sqlx::query_as::<_, Post>(concat!(
            r#"
            WITH src AS (
                INSERT INTO posts (text, author_id, image, group_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            )
            SELECT "#,
            post_columns!(),
            r#"
            FROM src
            JOIN users u ON u.id = src.author_id
            "#
        ))
        .bind(&record.text)
        .bind(record.author_id)
        .bind(&record.image)
        .bind(record.group_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)
    }

    async fn update_post(&self, id: i64, record: &PostRecord) -> Result<Option<Post>> {
        sqlx::query_as::<_, Post>(concat!(
            r#"
            WITH src AS (
                UPDATE posts
                SET text = $2, image = $3, group_id = $4
                WHERE id = $1
                RETURNING *
            )
            SELECT "#,
            post_columns!(),
            r#"
            FROM src
            JOIN users u ON u.id = src.author_id
            "#
        ))
        .bind(id)
        .bind(&record.text)
        .bind(&record.image)
        .bind(record.group_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_write_error)
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
