/// Data models for yatube-service
///
/// Row types carry the author's numeric id for permission checks but
/// serialize only the explicitly listed public fields. Input types contain
/// only the fields a client may set; identity fields are merged server-side.
use actix_middleware::Requester;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const BLANK_FIELD_MESSAGE: &str = "This field may not be blank.";
pub const SELF_FOLLOW_MESSAGE: &str = "Подписка на себя запрещена.";
pub const DUPLICATE_FOLLOW_MESSAGE: &str = "Повторная подписка запрещена.";

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed(BLANK_FIELD_MESSAGE));
        return Err(err);
    }
    Ok(())
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Identity provider user as seen by this service.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl From<&Requester> for User {
    fn from(requester: &Requester) -> Self {
        Self {
            id: requester.id,
            username: requester.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Input for the administrative group command.
#[derive(Debug, Clone, Validate)]
pub struct NewGroup {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// Author username
    pub author: String,
    pub image: Option<String>,
    /// Group id
    pub group: Option<i64>,
    #[serde(skip)]
    pub author_id: i64,
}

pub const IMAGE_MAX_LEN: usize = 255;

/// POST /posts/ and PUT /posts/{id}/ body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PostInput {
    #[validate(custom(function = "non_blank"))]
    pub text: String,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub group: Option<Option<i64>>,
}

/// PATCH /posts/{id}/ body. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PostPatch {
    #[validate(custom(function = "non_blank"))]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub group: Option<Option<i64>>,
}

impl From<PostInput> for PostPatch {
    fn from(input: PostInput) -> Self {
        Self {
            text: Some(input.text),
            image: input.image,
            group: input.group,
        }
    }
}

/// Stored post fields after the server-side merge of input and identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub author_id: i64,
    pub text: String,
    pub image: Option<String>,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Comment {
    pub id: i64,
    /// Author username
    pub author: String,
    /// Post id
    pub post: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    #[serde(skip)]
    pub author_id: i64,
}

/// POST and PUT body for comments.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentInput {
    #[validate(custom(function = "non_blank"))]
    pub text: String,
}

/// PATCH body for comments.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CommentPatch {
    #[validate(custom(function = "non_blank"))]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub author_id: i64,
    pub post_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Follow {
    pub id: i64,
    /// Follower username
    pub user: String,
    /// Followed username
    pub author: String,
}

/// POST /follow/ body.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct FollowInput {
    /// Username to follow
    #[serde(alias = "following")]
    #[validate(custom(function = "non_blank"))]
    pub author: String,
}

/// Rows of `follows` a caller is allowed to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowScope {
    /// Subscriptions made by this user id
    Follower(i64),
}
