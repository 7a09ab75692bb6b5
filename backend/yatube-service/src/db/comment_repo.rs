use async_trait::async_trait;

use super::{CommentRepository, PgStore};
use crate::error::Result;
use crate::models::{Comment, CommentRecord};

#[async_trait]
impl CommentRepository for PgStore {
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, u.username AS author, c.post_id AS post, c.text, c.created, c.author_id
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created, c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await?;

        Ok(comments)
    }

    async fn get_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, u.username AS author, c.post_id AS post, c.text, c.created, c.author_id
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1 AND c.id = $2
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(comment)
    }

    async fn create_comment(&self, record: &CommentRecord) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                INSERT INTO comments (author_id, post_id, text)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT c.id, u.username AS author, c.post_id AS post, c.text, c.created, c.author_id
            FROM c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(record.author_id)
        .bind(record.post_id)
        .bind(&record.text)
        .fetch_one(self.pool())
        .await?;

        Ok(comment)
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH c AS (
                UPDATE comments
                SET text = $3
                WHERE post_id = $1 AND id = $2
                RETURNING *
            )
            SELECT c.id, u.username AS author, c.post_id AS post, c.text, c.created, c.author_id
            FROM c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .bind(text)
        .fetch_optional(self.pool())
        .await?;

        Ok(comment)
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE post_id = $1 AND id = $2")
            .bind(post_id)
            .bind(comment_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
