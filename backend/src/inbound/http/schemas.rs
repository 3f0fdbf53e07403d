//! Response bodies shared by the user and article handlers.
//!
//! Domain types stay free of serde and OpenAPI concerns; these structs are
//! the wire shapes, built from domain values at the edge.

use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AuthoredArticle, User};

use super::token::IssuedToken;

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice Liddell")]
    pub full_name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            full_name: user.full_name().as_ref().to_owned(),
        }
    }
}

/// The caller's own profile, with audit timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            username: user.username().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            full_name: user.full_name().as_ref().to_owned(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: UserSummary,
}

/// Token handed out on successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl LoginResponse {
    pub fn new(issued: IssuedToken, user: &User) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer".to_owned(),
            expires_at: issued.expires_at,
            user: user.into(),
        }
    }
}

/// An article with its author. `author` is omitted once the author's
/// account has been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AuthoredArticle> for ArticleResponse {
    fn from(value: &AuthoredArticle) -> Self {
        let article = &value.article;
        Self {
            id: *article.id().as_uuid(),
            title: article.title().as_ref().to_owned(),
            content: article.content().as_ref().to_owned(),
            author_id: *article.author_id().as_uuid(),
            author: value.author.as_ref().map(UserSummary::from),
            created_at: article.created_at(),
            updated_at: article.updated_at(),
        }
    }
}

/// One page of articles with the paging values actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleList {
    pub articles: Vec<ArticleResponse>,
    pub total: u64,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub page_size: u32,
}

impl From<Page<AuthoredArticle>> for ArticleList {
    fn from(page: Page<AuthoredArticle>) -> Self {
        let page = page.map(|item| ArticleResponse::from(&item));
        Self {
            total: page.total(),
            page: page.page(),
            page_size: page.page_size(),
            articles: page.into_items(),
        }
    }
}
