//! Shared fixtures for API integration tests
//!
//! `MemoryStore` implements every repository trait in memory so the real
//! router, middleware and services can be exercised without PostgreSQL.

#![allow(dead_code)]

use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{web, App};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::{Arc, Mutex};

use actix_middleware::{Claims, JwtValidator};
use yatube_service::db::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, Repositories,
    UserRepository,
};
use yatube_service::error::{AppError, Result};
use yatube_service::models::{
    Comment, CommentRecord, Follow, FollowScope, Group, NewGroup, Post, PostRecord, User,
    DUPLICATE_FOLLOW_MESSAGE, SELF_FOLLOW_MESSAGE,
};
use yatube_service::pagination::LimitOffset;
use yatube_service::routes::api_scope;
use yatube_service::AppState;

pub const PRIVATE_KEY: &str = include_str!("../fixtures/jwt_private.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/jwt_public.pem");

pub const ALICE: (i64, &str) = (1, "alice");
pub const BOB: (i64, &str) = (2, "bob");
pub const CAROL: (i64, &str) = (3, "carol");
/// Valid token identity with no `users` row until its first write.
pub const DAVE: (i64, &str) = (4, "dave");

#[derive(Debug, Clone)]
struct PostRow {
    id: i64,
    text: String,
    pub_date: chrono::DateTime<Utc>,
    author_id: i64,
    image: Option<String>,
    group_id: Option<i64>,
}

#[derive(Debug, Clone)]
struct CommentRow {
    id: i64,
    author_id: i64,
    post_id: i64,
    text: String,
    created: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct FollowRow {
    id: i64,
    user_id: i64,
    author_id: i64,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<PostRow>,
    comments: Vec<CommentRow>,
    follows: Vec<FollowRow>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn username(&self, user_id: i64) -> String {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn post(&self, row: &PostRow) -> Post {
        Post {
            id: row.id,
            text: row.text.clone(),
            pub_date: row.pub_date,
            author: self.username(row.author_id),
            image: row.image.clone(),
            group: row.group_id,
            author_id: row.author_id,
        }
    }

    fn comment(&self, row: &CommentRow) -> Comment {
        Comment {
            id: row.id,
            author: self.username(row.author_id),
            post: row.post_id,
            text: row.text.clone(),
            created: row.created,
            author_id: row.author_id,
        }
    }

    fn follow(&self, row: &FollowRow) -> Follow {
        Follow {
            id: row.id,
            user: self.username(row.user_id),
            author: self.username(row.author_id),
        }
    }
}

/// In-memory store with the same constraints as the SQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Store seeded with alice, bob and carol.
    pub fn seeded() -> Arc<Self> {
        let store = Self::default();
        {
            let mut tables = store.tables.lock().unwrap();
            for (id, username) in [ALICE, BOB, CAROL] {
                tables.users.push(User {
                    id,
                    username: username.to_string(),
                });
            }
            tables.next_id = 100;
        }
        Arc::new(store)
    }

    pub fn add_group(&self, title: &str, slug: &str) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.groups.push(Group {
            id,
            title: title.to_string(),
            slug: slug.to_string(),
            description: String::new(),
        });
        id
    }

    pub fn add_post(&self, author_id: i64, text: &str, group_id: Option<i64>) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.posts.push(PostRow {
            id,
            text: text.to_string(),
            pub_date: Utc::now(),
            author_id,
            image: None,
            group_id,
        });
        id
    }

    pub fn add_comment(&self, author_id: i64, post_id: i64, text: &str) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.comments.push(CommentRow {
            id,
            author_id,
            post_id,
            text: text.to_string(),
            created: Utc::now(),
        });
        id
    }

    pub fn add_follow(&self, user_id: i64, author_id: i64) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.next_id();
        tables.follows.push(FollowRow {
            id,
            user_id,
            author_id,
        });
        id
    }

    pub fn post_count(&self) -> usize {
        self.tables.lock().unwrap().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.tables.lock().unwrap().comments.len()
    }

    pub fn group_count(&self) -> usize {
        self.tables.lock().unwrap().groups.len()
    }

    pub fn follow_count(&self) -> usize {
        self.tables.lock().unwrap().follows.len()
    }

    pub fn post_text(&self, post_id: i64) -> Option<String> {
        let tables = self.tables.lock().unwrap();
        tables
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.text.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn upsert_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        for stale in tables
            .users
            .iter_mut()
            .filter(|u| u.username == user.username && u.id != user.id)
        {
            stale.username = format!("{}#{}", stale.username, stale.id);
        }
        match tables.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => existing.username = user.username.clone(),
            None => tables.users.push(user.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.tables.lock().unwrap().groups.clone())
    }

    async fn get_group(&self, id: i64) -> Result<Option<Group>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group> {
        let mut tables = self.tables.lock().unwrap();
        if tables.groups.iter().any(|g| g.slug == group.slug) {
            return Err(AppError::invalid_field(
                "slug",
                "group with this slug already exists.",
            ));
        }
        let created = Group {
            id: tables.next_id(),
            title: group.title.clone(),
            slug: group.slug.clone(),
            description: group.description.clone(),
        };
        tables.groups.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn count_posts(&self) -> Result<i64> {
        Ok(self.tables.lock().unwrap().posts.len() as i64)
    }

    async fn list_posts(&self, window: Option<LimitOffset>) -> Result<Vec<Post>> {
        let tables = self.tables.lock().unwrap();
        let rows = tables.posts.iter();
        let posts: Vec<Post> = match window {
            Some(w) => rows
                .skip(w.offset as usize)
                .take(w.limit as usize)
                .map(|r| tables.post(r))
                .collect(),
            None => rows.map(|r| tables.post(r)).collect(),
        };
        Ok(posts)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.post(p)))
    }

    async fn post_exists(&self, id: i64) -> Result<bool> {
        Ok(self.tables.lock().unwrap().posts.iter().any(|p| p.id == id))
    }

    async fn create_post(&self, record: &PostRecord) -> Result<Post> {
        let mut tables = self.tables.lock().unwrap();
        let row = PostRow {
            id: tables.next_id(),
            text: record.text.clone(),
            pub_date: Utc::now(),
            author_id: record.author_id,
            image: record.image.clone(),
            group_id: record.group_id,
        };
        tables.posts.push(row.clone());
        Ok(tables.post(&row))
    }

    async fn update_post(&self, id: i64, record: &PostRecord) -> Result<Option<Post>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        row.text = record.text.clone();
        row.image = record.image.clone();
        row.group_id = record.group_id;
        let row = row.clone();
        Ok(Some(tables.post(&row)))
    }

    async fn delete_post(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        tables.comments.retain(|c| c.post_id != id);
        Ok(tables.posts.len() != before)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| tables.comment(c))
            .collect())
    }

    async fn get_comment(&self, post_id: i64, comment_id: i64) -> Result<Option<Comment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .find(|c| c.id == comment_id && c.post_id == post_id)
            .map(|c| tables.comment(c)))
    }

    async fn create_comment(&self, record: &CommentRecord) -> Result<Comment> {
        let mut tables = self.tables.lock().unwrap();
        let row = CommentRow {
            id: tables.next_id(),
            author_id: record.author_id,
            post_id: record.post_id,
            text: record.text.clone(),
            created: Utc::now(),
        };
        tables.comments.push(row.clone());
        Ok(tables.comment(&row))
    }

    async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        text: &str,
    ) -> Result<Option<Comment>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id && c.post_id == post_id)
        else {
            return Ok(None);
        };
        row.text = text.to_string();
        let row = row.clone();
        Ok(Some(tables.comment(&row)))
    }

    async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.comments.len();
        tables
            .comments
            .retain(|c| !(c.id == comment_id && c.post_id == post_id));
        Ok(tables.comments.len() != before)
    }
}

#[async_trait]
impl FollowRepository for MemoryStore {
    async fn list_follows(&self, scope: FollowScope, terms: &[String]) -> Result<Vec<Follow>> {
        let tables = self.tables.lock().unwrap();
        let FollowScope::Follower(follower_id) = scope;
        let terms: Vec<String> = terms.iter().map(|t| t.to_lowercase()).collect();

        Ok(tables
            .follows
            .iter()
            .filter(|f| f.user_id == follower_id)
            .map(|f| tables.follow(f))
            .filter(|f| {
                let user = f.user.to_lowercase();
                let author = f.author.to_lowercase();
                terms
                    .iter()
                    .all(|t| user.contains(t.as_str()) || author.contains(t.as_str()))
            })
            .collect())
    }

    async fn follow_exists(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }

    async fn create_follow(&self, user_id: i64, author_id: i64) -> Result<Follow> {
        let mut tables = self.tables.lock().unwrap();
        if user_id == author_id {
            return Err(AppError::invalid_field("author", SELF_FOLLOW_MESSAGE));
        }
        if tables
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id)
        {
            return Err(AppError::invalid_field("author", DUPLICATE_FOLLOW_MESSAGE));
        }
        let row = FollowRow {
            id: tables.next_id(),
            user_id,
            author_id,
        };
        tables.follows.push(row);
        Ok(tables.follow(&row))
    }
}

/// Sign an access token for `user` with the fixture key.
pub fn token_for(user: (i64, &str)) -> String {
    sign(user.0.to_string(), user.1, "access", 3600)
}

pub fn sign(sub: String, username: &str, token_type: &str, expires_in: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub,
        iat: now,
        exp: now + expires_in,
        token_type: token_type.to_string(),
        username: username.to_string(),
    };
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap();
    encode(&Header::new(Algorithm::RS256), &claims, &key).unwrap()
}

pub fn bearer(user: (i64, &str)) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user)))
}

/// The production router over `store`.
pub fn app(
    store: Arc<MemoryStore>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody<Error = Box<dyn std::error::Error>>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let validator = Arc::new(JwtValidator::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap());
    let state = AppState::new(Repositories::from_store(store));

    App::new()
        .app_data(web::Data::new(state))
        .wrap(NormalizePath::new(TrailingSlash::Trim))
        .service(api_scope(validator))
}
