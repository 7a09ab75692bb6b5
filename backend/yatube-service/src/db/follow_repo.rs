use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Row};

use super::{violated_constraint, FollowRepository, PgStore};
use crate::error::{AppError, Result};
use crate::models::{Follow, FollowScope, DUPLICATE_FOLLOW_MESSAGE, SELF_FOLLOW_MESSAGE};

/// Escape LIKE wildcards so search terms match literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl FollowRepository for PgStore {
    async fn list_follows(&self, scope: FollowScope, terms: &[String]) -> Result<Vec<Follow>> {
        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT f.id, fu.username AS "user", fa.username AS author
            FROM follows f
            JOIN users fu ON fu.id = f.user_id
            JOIN users fa ON fa.id = f.author_id
            WHERE "#,
        );

        match scope {
            FollowScope::Follower(user_id) => {
                query.push("f.user_id = ").push_bind(user_id);
            }
        }

        for term in terms {
            let pattern = like_pattern(term);
            query
                .push(" AND (fu.username ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR fa.username ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query.push(" ORDER BY f.id");

        let follows = query
            .build_query_as::<Follow>()
            .fetch_all(self.pool())
            .await?;

        Ok(follows)
    }

    async fn follow_exists(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2) AS found",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(self.pool())
        .await?;

        Ok(row.get::<bool, _>("found"))
    }

    async fn create_follow(&self, user_id: i64, author_id: i64) -> Result<Follow> {
        sqlx::query_as::<_, Follow>(
            r#"
            WITH f AS (
                INSERT INTO follows (user_id, author_id)
                VALUES ($1, $2)
                RETURNING id, user_id, author_id
            )
            SELECT f.id, fu.username AS "user", fa.username AS author
            FROM f
            JOIN users fu ON fu.id = f.user_id
            JOIN users fa ON fa.id = f.author_id
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("follows_unique_pair") => {
                AppError::invalid_field("author", DUPLICATE_FOLLOW_MESSAGE)
            }
            Some("follows_no_self_follow") => AppError::invalid_field("author", SELF_FOLLOW_MESSAGE),
            _ => AppError::from(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("bob"), "%bob%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
