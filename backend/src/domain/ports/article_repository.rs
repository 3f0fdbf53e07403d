//! Port abstraction for article persistence adapters and their errors.
//!
//! Adapters must treat soft-deleted articles as absent on every read and
//! return listings newest first. Reads come back with the author's account
//! attached when that account is still live.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Article, ArticleId, AuthoredArticle, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticlePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
        /// The referenced author does not exist.
        UnknownAuthor => "article author does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Persist a new article.
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError>;

    /// Fetch a live article by identifier.
    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<AuthoredArticle>, ArticlePersistenceError>;

    /// One page of live articles, newest first.
    async fn list(&self, request: PageRequest) -> Result<Page<AuthoredArticle>, ArticlePersistenceError>;

    /// One page of a single author's live articles, newest first.
    async fn list_by_author(
        &self,
        author_id: &UserId,
        request: PageRequest,
    ) -> Result<Page<AuthoredArticle>, ArticlePersistenceError>;

    /// Overwrite title, content and `updated_at`.
    ///
    /// Returns `false` when no live article matched.
    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError>;

    /// Mark a live article as deleted.
    ///
    /// Returns `false` when no live article matched.
    async fn soft_delete(
        &self,
        id: &ArticleId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, ArticlePersistenceError>;
}
