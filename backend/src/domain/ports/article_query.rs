//! Driving port for article reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{ArticleId, AuthoredArticle, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// Fetch a live article or fail with `not_found`.
    async fn get(&self, id: &ArticleId) -> Result<AuthoredArticle, Error>;

    /// One page of all live articles, newest first.
    async fn list(&self, request: PageRequest) -> Result<Page<AuthoredArticle>, Error>;

    /// One page of a single author's live articles, newest first.
    async fn list_by_author(
        &self,
        author_id: &UserId,
        request: PageRequest,
    ) -> Result<Page<AuthoredArticle>, Error>;
}
