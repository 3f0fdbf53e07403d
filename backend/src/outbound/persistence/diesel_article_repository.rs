//! PostgreSQL-backed `ArticleRepository`.
//!
//! Reads left-join `users` on the author id, restricted to live accounts, so
//! an article whose author was deleted still loads with no author attached.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{ArticlePersistenceError, ArticleRepository};
use crate::domain::{
    Article, ArticleBody, ArticleId, ArticleTitle, ArticleValidationError, AuthoredArticle, Email,
    FullName, NewArticle, User, UserId, UserValidationError, Username,
};

use super::diesel_error_mapping::{DieselFailure, classify, pool_message};
use super::models::{ArticleChangeset, ArticleRow, AuthorRow, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{articles, users};

type JoinedRow = (ArticleRow, Option<AuthorRow>);

/// `articles` joined to the live account of each article's author.
macro_rules! articles_with_authors {
    () => {
        articles::table.left_join(
            users::table.on(users::id
                .eq(articles::author_id)
                .and(users::deleted_at.is_null())),
        )
    };
}

/// Diesel implementation of [`ArticleRepository`].
///
/// Listings are ordered by `created_at DESC, id DESC` so pages stay stable
/// when two articles share a timestamp.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn page(
        &self,
        author: Option<Uuid>,
        request: PageRequest,
    ) -> Result<Page<AuthoredArticle>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let scoped = || {
            let query = articles_with_authors!()
                .filter(articles::deleted_at.is_null())
                .into_boxed();
            match author {
                Some(author) => query.filter(articles::author_id.eq(author)),
                None => query,
            }
        };

        let total: i64 = scoped()
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<JoinedRow> = scoped()
            .order((articles::created_at.desc(), articles::id.desc()))
            .offset(i64::try_from(request.offset()).unwrap_or(i64::MAX))
            .limit(i64::from(request.limit()))
            .select((ArticleRow::as_select(), Option::<AuthorRow>::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(joined_to_authored)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, u64::try_from(total).unwrap_or(0), request))
    }
}

fn map_pool_error(error: PoolError) -> ArticlePersistenceError {
    ArticlePersistenceError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ArticlePersistenceError {
    match classify(error) {
        DieselFailure::Connection(message) => ArticlePersistenceError::connection(message),
        DieselFailure::ForeignKeyViolation => ArticlePersistenceError::unknown_author(),
        DieselFailure::UniqueViolation(_) => {
            ArticlePersistenceError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => ArticlePersistenceError::query(message),
    }
}

fn corrupt_row(id: Uuid, error: ArticleValidationError) -> ArticlePersistenceError {
    warn!(article_id = %id, %error, "stored article row failed validation");
    ArticlePersistenceError::query("stored article record is invalid")
}

fn corrupt_author(id: Uuid, error: UserValidationError) -> ArticlePersistenceError {
    warn!(user_id = %id, %error, "stored author row failed validation");
    ArticlePersistenceError::query("stored author record is invalid")
}

fn row_to_author(row: AuthorRow) -> Result<User, ArticlePersistenceError> {
    let id = row.id;
    let username = Username::new(&row.username).map_err(|err| corrupt_author(id, err))?;
    let email = Email::new(&row.email).map_err(|err| corrupt_author(id, err))?;
    let full_name = FullName::new(&row.full_name).map_err(|err| corrupt_author(id, err))?;
    Ok(
        User::new(UserId::from_uuid(id), username, email, full_name, row.created_at)
            .with_updated_at(row.updated_at),
    )
}

fn joined_to_authored(
    (article, author): JoinedRow,
) -> Result<AuthoredArticle, ArticlePersistenceError> {
    let article = row_to_article(article)?;
    let author = author.map(row_to_author).transpose()?;
    Ok(AuthoredArticle::new(article, author))
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticlePersistenceError> {
    let id = row.id;
    let draft = NewArticle {
        title: ArticleTitle::new(&row.title).map_err(|err| corrupt_row(id, err))?,
        content: ArticleBody::new(row.content).map_err(|err| corrupt_row(id, err))?,
    };
    Ok(Article::new(
        ArticleId::from_uuid(id),
        draft,
        UserId::from_uuid(row.author_id),
        row.created_at,
    )
    .with_updated_at(row.updated_at))
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewArticleRow {
            id: *article.id().as_uuid(),
            title: article.title().as_ref(),
            content: article.content().as_ref(),
            author_id: *article.author_id().as_uuid(),
            created_at: article.created_at(),
            updated_at: article.updated_at(),
        };
        diesel::insert_into(articles::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: &ArticleId,
    ) -> Result<Option<AuthoredArticle>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        articles_with_authors!()
            .filter(articles::id.eq(*id.as_uuid()))
            .filter(articles::deleted_at.is_null())
            .select((ArticleRow::as_select(), Option::<AuthorRow>::as_select()))
            .first::<JoinedRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(joined_to_authored)
            .transpose()
    }

    async fn list(&self, request: PageRequest) -> Result<Page<AuthoredArticle>, ArticlePersistenceError> {
        self.page(None, request).await
    }

    async fn list_by_author(
        &self,
        author_id: &UserId,
        request: PageRequest,
    ) -> Result<Page<AuthoredArticle>, ArticlePersistenceError> {
        self.page(Some(*author_id.as_uuid()), request).await
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ArticleChangeset {
            title: article.title().as_ref(),
            content: article.content().as_ref(),
            updated_at: article.updated_at(),
        };
        let updated = diesel::update(
            articles::table
                .filter(articles::id.eq(*article.id().as_uuid()))
                .filter(articles::deleted_at.is_null()),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn soft_delete(
        &self,
        id: &ArticleId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            articles::table
                .filter(articles::id.eq(*id.as_uuid()))
                .filter(articles::deleted_at.is_null()),
        )
        .set((
            articles::deleted_at.eq(Some(deleted_at)),
            articles::updated_at.eq(deleted_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
