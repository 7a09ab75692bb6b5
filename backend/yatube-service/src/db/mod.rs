//! Database access layer
//!
//! Each resource has a repository trait; `PgStore` implements all of them on
//! PostgreSQL. Services only see the traits, so tests can swap the store.

pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{
    Comment, CommentRecord, Follow, FollowScope, Group, NewGroup, Post, PostRecord, User,
};
use crate::pagination::LimitOffset;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Mirror a token identity into `users` so authored rows can reference it.
    /// The token is authoritative: if another id holds the username, that row
    /// gives it up.
    async fn upsert_user(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<Group>>;

    async fn get_group(&self, id: i64) -> Result<Option<Group>>;

    /// Administrative creation; a duplicate slug is a validation error.
    async fn create_group(&self, group: &NewGroup) -> Result<Group>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn count_posts(&self) -> Result<i64>;

    /// All posts ordered by publication date, optionally windowed.
    async fn list_posts(&self, window: Option<LimitOffset>) -> Result<Vec<Post>>;

    async fn get_post(&self, id: i64) -> Result<Option<Post>>;

    async fn post_exists(&self, id: i64) -> Result<bool>;

    async fn create_post(&self, record: &PostRecord) -> Result<Post>;

    /// Overwrite text, image and group. The author column is never changed.
    async fn update_post(&self, id: i64, record: &PostRecord) -> Result<Option<Post>>;

    async fn delete_post(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>>;

    async fn get_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>>;

    async fn create_comment(&self, record: &CommentRecord) -> Result<Comment>;

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Option<Comment>>;

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Follows visible within `scope`, each search term matching the follower
    /// or the followed username (case-insensitive substring).
    async fn list_follows(&self, scope: FollowScope, terms: &[String]) -> Result<Vec<Follow>>;

    async fn follow_exists(&self, user_id: i64, author_id: i64) -> Result<bool>;

    /// Insert a follow. Store constraint violations surface as the same
    /// validation errors the service raises before inserting.
    async fn create_follow(&self, user_id: i64, author_id: i64) -> Result<Follow>;
}

/// PostgreSQL implementation of every repository trait
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// The repository set handed to services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    /// Use one store object for every repository.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + GroupRepository
            + PostRepository
            + CommentRepository
            + FollowRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)))
    }
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    tracing::debug!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Name of the constraint behind a database error, if any.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
