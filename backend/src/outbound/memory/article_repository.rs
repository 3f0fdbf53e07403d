//! In-memory `ArticleRepository` adapter.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use super::{InMemoryUserRepository, lock};
use crate::domain::ports::{ArticlePersistenceError, ArticleRepository};
use crate::domain::{Article, ArticleId, AuthoredArticle, UserId};

#[derive(Debug, Clone)]
struct StoredArticle {
    article: Article,
    deleted_at: Option<DateTime<Utc>>,
}

/// Article store held in process memory.
///
/// Authors are resolved against the user store it was built with, so an
/// author whose account is deleted reads back as absent.
#[derive(Debug)]
pub struct InMemoryArticleRepository {
    rows: Mutex<Vec<StoredArticle>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryArticleRepository {
    /// An empty store whose authors live in `users`.
    #[must_use]
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            users,
        }
    }

    fn with_author(&self, article: Article) -> AuthoredArticle {
        let author = self.users.live_user(article.author_id());
        AuthoredArticle::new(article, author)
    }

    fn page_where<P>(&self, request: PageRequest, predicate: P) -> Page<AuthoredArticle>
    where
        P: Fn(&Article) -> bool,
    {
        let mut matching: Vec<Article> = lock(&self.rows)
            .iter()
            .filter(|row| row.deleted_at.is_none() && predicate(&row.article))
            .map(|row| row.article.clone())
            .collect();
        matching.sort_by_key(|article| Reverse((article.created_at(), *article.id())));

        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|article| self.with_author(article))
            .collect();
        Page::new(items, total, request)
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut rows = lock(&self.rows);
        if rows.iter().any(|row| row.article.id() == article.id()) {
            return Err(ArticlePersistenceError::query(format!(
                "article {} already exists",
                article.id()
            )));
        }
        rows.push(StoredArticle {
            article: article.clone(),
            deleted_at: None,
        });
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<AuthoredArticle>, ArticlePersistenceError> {
        let article = lock(&self.rows)
            .iter()
            .find(|row| row.deleted_at.is_none() && row.article.id() == id)
            .map(|row| row.article.clone());
        Ok(article.map(|article| self.with_author(article)))
    }

    async fn list(&self, request: PageRequest) -> Result<Page<AuthoredArticle>, ArticlePersistenceError> {
        Ok(self.page_where(request, |_| true))
    }

    async fn list_by_author(
        &self,
        author_id: &UserId,
        request: PageRequest,
    ) -> Result<Page<AuthoredArticle>, ArticlePersistenceError> {
        Ok(self.page_where(request, |article| article.author_id() == author_id))
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.deleted_at.is_none() && row.article.id() == article.id())
        else {
            return Ok(false);
        };
        row.article = article.clone();
        Ok(true)
    }

    async fn soft_delete(
        &self,
        id: &ArticleId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, ArticlePersistenceError> {
        let mut rows = lock(&self.rows);
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.deleted_at.is_none() && row.article.id() == id)
        else {
            return Ok(false);
        };
        row.deleted_at = Some(deleted_at);
        Ok(true)
    }
}
