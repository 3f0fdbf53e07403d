//! Article data model.
//!
//! An article's author is fixed at creation. [`Article::revise`] can change
//! the title and body but there is no way to reassign ownership.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ownership::Owned;
use super::user::{User, UserId};

/// Minimum title length in characters.
pub const TITLE_MIN: usize = 3;
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 200;
/// Minimum body length in characters.
pub const BODY_MIN: usize = 10;

/// Validation errors raised by article value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooShort { min: usize },
    TitleTooLong { max: usize },
    EmptyBody,
    BodyTooShort { min: usize },
}

impl ArticleValidationError {
    /// Name of the request field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle | Self::TitleTooShort { .. } | Self::TitleTooLong { .. } => "title",
            Self::EmptyBody | Self::BodyTooShort { .. } => "content",
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyTitle | Self::EmptyBody => "required",
            Self::TitleTooShort { .. } | Self::BodyTooShort { .. } => "too_short",
            Self::TitleTooLong { .. } => "too_long",
        }
    }
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "invalid article id"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooShort { min } => write!(f, "title must be at least {min} characters"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyBody => write!(f, "content must not be empty"),
            Self::BodyTooShort { min } => {
                write!(f, "content must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Stable article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Parse an [`ArticleId`] from a path segment.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ArticleValidationError> {
        Uuid::parse_str(id.as_ref().trim())
            .map(Self)
            .map_err(|_| ArticleValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Article headline, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTitle(String);

impl ArticleTitle {
    /// Validate and construct a title.
    pub fn new(title: impl AsRef<str>) -> Result<Self, ArticleValidationError> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        let length = trimmed.chars().count();
        if length < TITLE_MIN {
            return Err(ArticleValidationError::TitleTooShort { min: TITLE_MIN });
        }
        if length > TITLE_MAX {
            return Err(ArticleValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ArticleTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Article text. Stored as written; only the length check ignores
/// surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBody(String);

impl ArticleBody {
    /// Validate and construct a body.
    pub fn new(body: impl Into<String>) -> Result<Self, ArticleValidationError> {
        let body = body.into();
        let length = body.trim().chars().count();
        if length == 0 {
            return Err(ArticleValidationError::EmptyBody);
        }
        if length < BODY_MIN {
            return Err(ArticleValidationError::BodyTooShort { min: BODY_MIN });
        }
        Ok(Self(body))
    }
}

impl AsRef<str> for ArticleBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Title and body supplied when creating an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: ArticleTitle,
    pub content: ArticleBody,
}

/// Replacement title and body for an existing article.
pub type ArticleRevision = NewArticle;

/// Published article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id: ArticleId,
    title: ArticleTitle,
    content: ArticleBody,
    author_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Article {
    /// Build a fresh article owned by `author_id`.
    #[must_use]
    pub fn new(id: ArticleId, draft: NewArticle, author_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            author_id,
            created_at,
            updated_at: created_at,
        }
    }

    /// Replace the last-modified timestamp.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Replace title and body. The author is untouched.
    pub fn revise(&mut self, revision: ArticleRevision, at: DateTime<Utc>) {
        self.title = revision.title;
        self.content = revision.content;
        self.updated_at = at;
    }

    /// Stable identifier.
    #[must_use]
    pub const fn id(&self) -> &ArticleId {
        &self.id
    }

    /// Headline.
    #[must_use]
    pub const fn title(&self) -> &ArticleTitle {
        &self.title
    }

    /// Body text.
    #[must_use]
    pub const fn content(&self) -> &ArticleBody {
        &self.content
    }

    /// Owning user.
    #[must_use]
    pub const fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Owned for Article {
    fn owner_id(&self) -> &UserId {
        &self.author_id
    }
}

/// An article as read back from storage, together with its author.
///
/// `author` is `None` once the author's account has been deleted; the
/// article itself stays readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredArticle {
    pub article: Article,
    pub author: Option<User>,
}

impl AuthoredArticle {
    #[must_use]
    pub const fn new(article: Article, author: Option<User>) -> Self {
        Self { article, author }
    }
}

impl Owned for AuthoredArticle {
    fn owner_id(&self) -> &UserId {
        self.article.author_id()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn draft(title: &str, content: &str) -> NewArticle {
        NewArticle {
            title: ArticleTitle::new(title).expect("valid title"),
            content: ArticleBody::new(content).expect("valid body"),
        }
    }

    #[rstest]
    #[case(String::new(), ArticleValidationError::EmptyTitle)]
    #[case("  ".to_owned(), ArticleValidationError::EmptyTitle)]
    #[case("Hi".to_owned(), ArticleValidationError::TitleTooShort { min: TITLE_MIN })]
    #[case("t".repeat(TITLE_MAX + 1), ArticleValidationError::TitleTooLong { max: TITLE_MAX })]
    fn rejects_invalid_titles(#[case] raw: String, #[case] expected: ArticleValidationError) {
        assert_eq!(ArticleTitle::new(raw), Err(expected));
    }

    #[rstest]
    #[case("", ArticleValidationError::EmptyBody)]
    #[case("   \n ", ArticleValidationError::EmptyBody)]
    #[case("too short", ArticleValidationError::BodyTooShort { min: BODY_MIN })]
    #[case("   123456789   ", ArticleValidationError::BodyTooShort { min: BODY_MIN })]
    fn rejects_invalid_bodies(#[case] raw: &str, #[case] expected: ArticleValidationError) {
        assert_eq!(ArticleBody::new(raw), Err(expected));
    }

    #[rstest]
    fn body_keeps_formatting() {
        let body = ArticleBody::new("\nfirst line\nsecond line\n").expect("valid body");
        assert_eq!(body.as_ref(), "\nfirst line\nsecond line\n");
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case("abc", false)]
    #[case("1", false)]
    fn parses_article_ids(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(ArticleId::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn revise_keeps_author_and_creation_time() {
        let author = UserId::random();
        let mut article = Article::new(
            ArticleId::random(),
            draft("Hello world", "Lorem ipsum dolor sit amet"),
            author,
            at(8),
        );

        article.revise(draft("Second draft", "Consectetur adipiscing elit"), at(9));

        assert_eq!(article.author_id(), &author);
        assert_eq!(article.title().as_ref(), "Second draft");
        assert_eq!(article.created_at(), at(8));
        assert_eq!(article.updated_at(), at(9));
    }
}
