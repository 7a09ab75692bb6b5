use async_trait::async_trait;

use super::{PgStore, UserRepository};
use crate::error::Result;
use crate::models::User;

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    /// A username the identity provider moved to another id is released
    /// from its stale row (renamed `<name>#<old id>`) before the upsert.
    async fn upsert_user(&self, user: &User) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        let released = sqlx::query(
            r#"
            UPDATE users
            SET username = LEFT(username, 128) || '#' || id::text
            WHERE username = $2 AND id <> $1
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .execute(&mut *tx)
        .await?;

        if released.rows_affected() > 0 {
            tracing::warn!(
                user_id = user.id,
                username = %user.username,
                "username reassigned by identity provider; stale row renamed"
            );
        }

        sqlx::query(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
