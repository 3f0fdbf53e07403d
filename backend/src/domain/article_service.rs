//! Article domain service.
//!
//! Reads are open to everyone. Creation requires an existing author, and
//! update/delete are gated by [`ensure_owner`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{info, warn};

use crate::domain::ports::{
    ArticleCommand, ArticlePersistenceError, ArticleQuery, ArticleRepository, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Article, ArticleId, ArticleRevision, AuthoredArticle, Error, NewArticle, UserId, ensure_owner,
};

/// Typed article failures surfaced by [`ArticleService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArticleError {
    /// The author id does not resolve to a live user.
    #[error("author not found")]
    AuthorNotFound,
    /// The article does not exist or has been deleted.
    #[error("article not found")]
    ArticleNotFound,
    /// The requester does not own the article.
    #[error("you do not have permission to modify this article")]
    PermissionDenied,
}

impl From<ArticleError> for Error {
    fn from(value: ArticleError) -> Self {
        let message = value.to_string();
        match value {
            ArticleError::AuthorNotFound | ArticleError::ArticleNotFound => {
                Error::not_found(message)
            }
            ArticleError::PermissionDenied => Error::forbidden(message),
        }
    }
}

fn map_article_error(error: ArticlePersistenceError) -> Error {
    match error {
        ArticlePersistenceError::Connection { message } => {
            warn!(error = %message, "article repository unavailable");
            Error::service_unavailable("article repository unavailable")
        }
        ArticlePersistenceError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
        ArticlePersistenceError::UnknownAuthor => ArticleError::AuthorNotFound.into(),
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(error = %message, "user repository unavailable");
            Error::service_unavailable("user repository unavailable")
        }
        other => Error::internal(format!("user repository error: {other}")),
    }
}

/// Article service implementing the article driving ports.
#[derive(Clone)]
pub struct ArticleService<A, U> {
    articles: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, U> ArticleService<A, U> {
    /// Create a service over the article store and the user directory used
    /// to resolve authors.
    pub fn new(articles: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            articles,
            users,
            clock,
        }
    }
}

impl<A, U> ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn load(&self, id: &ArticleId) -> Result<AuthoredArticle, Error> {
        self.articles
            .find_by_id(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| ArticleError::ArticleNotFound.into())
    }

    async fn load_owned(
        &self,
        id: &ArticleId,
        requester: &UserId,
    ) -> Result<AuthoredArticle, Error> {
        let article = self.load(id).await?;
        ensure_owner(&article, requester, &ArticleError::PermissionDenied.to_string())?;
        Ok(article)
    }
}

#[async_trait]
impl<A, U> ArticleCommand for ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        author_id: &UserId,
        draft: NewArticle,
    ) -> Result<AuthoredArticle, Error> {
        let author = self
            .users
            .find_by_id(author_id)
            .await
            .map_err(map_user_error)?
            .ok_or(ArticleError::AuthorNotFound)?;

        let article = Article::new(ArticleId::random(), draft, *author_id, self.clock.utc());
        self.articles
            .insert(&article)
            .await
            .map_err(map_article_error)?;

        info!(article_id = %article.id(), author_id = %author_id, "article created");
        Ok(AuthoredArticle::new(article, Some(author)))
    }

    async fn update(
        &self,
        id: &ArticleId,
        requester: &UserId,
        revision: ArticleRevision,
    ) -> Result<AuthoredArticle, Error> {
        let mut authored = self.load_owned(id, requester).await?;
        authored.article.revise(revision, self.clock.utc());

        let updated = self
            .articles
            .update(&authored.article)
            .await
            .map_err(map_article_error)?;
        if !updated {
            return Err(ArticleError::ArticleNotFound.into());
        }
        Ok(authored)
    }

    async fn delete(&self, id: &ArticleId, requester: &UserId) -> Result<(), Error> {
        self.load_owned(id, requester).await?;

        let deleted = self
            .articles
            .soft_delete(id, self.clock.utc())
            .await
            .map_err(map_article_error)?;
        if !deleted {
            return Err(ArticleError::ArticleNotFound.into());
        }
        info!(article_id = %id, "article deleted");
        Ok(())
    }
}

#[async_trait]
impl<A, U> ArticleQuery for ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn get(&self, id: &ArticleId) -> Result<AuthoredArticle, Error> {
        self.load(id).await
    }

    async fn list(&self, request: PageRequest) -> Result<Page<AuthoredArticle>, Error> {
        self.articles.list(request).await.map_err(map_article_error)
    }

    async fn list_by_author(
        &self,
        author_id: &UserId,
        request: PageRequest,
    ) -> Result<Page<AuthoredArticle>, Error> {
        self.articles
            .list_by_author(author_id, request)
            .await
            .map_err(map_article_error)
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;
