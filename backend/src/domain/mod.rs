//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed domain entities plus the services that
//! orchestrate them. Nothing here knows about HTTP or SQL; adapters reach the
//! domain only through the traits in [`ports`].

pub mod account_service;
pub mod article;
pub mod article_service;
pub mod auth;
pub mod error;
pub mod ownership;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountError, AccountService};
pub use self::article::{
    Article, ArticleBody, ArticleId, ArticleRevision, ArticleTitle, ArticleValidationError,
    AuthoredArticle, NewArticle,
};
pub use self::article_service::{ArticleError, ArticleService};
pub use self::auth::{CredentialValidationError, LoginCredentials, Password, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ownership::{Owned, ensure_owner, is_owner};
pub use self::password::{
    HashedPassword, PasswordHashError, hash_password, hash_password_off_thread, verify_password,
    verify_password_off_thread,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, FullName, ProfileUpdate, User, UserId, UserValidationError, Username,
};
