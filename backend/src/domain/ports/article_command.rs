//! Driving port for article mutations.
//!
//! Update and delete are gated on ownership: a missing article yields
//! `not_found`, an article owned by someone else yields `forbidden`.

use async_trait::async_trait;

use crate::domain::{ArticleId, ArticleRevision, AuthoredArticle, Error, NewArticle, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Publish an article owned by `author_id`.
    async fn create(&self, author_id: &UserId, draft: NewArticle) -> Result<AuthoredArticle, Error>;

    /// Replace title and content of an article the requester owns.
    async fn update(
        &self,
        id: &ArticleId,
        requester: &UserId,
        revision: ArticleRevision,
    ) -> Result<AuthoredArticle, Error>;

    /// Soft-delete an article the requester owns.
    async fn delete(&self, id: &ArticleId, requester: &UserId) -> Result<(), Error>;
}
