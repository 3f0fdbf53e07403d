//! Port abstraction for user persistence adapters and their errors.
//!
//! Adapters must treat soft-deleted users as absent on every read and must
//! enforce username/email uniqueness among live users themselves, reporting
//! violations as [`UserPersistenceError::DuplicateUsername`] or
//! [`UserPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Email, HashedPassword, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another live user already holds the username.
        DuplicateUsername => "username already exists",
        /// Another live user already holds the email.
        DuplicateEmail => "email already exists",
    }
}

/// A user together with their stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentialsRecord {
    pub user: User,
    pub password_hash: HashedPassword,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    async fn insert(
        &self,
        user: &User,
        password_hash: &HashedPassword,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a live user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a live user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a live user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a live user and their password digest by email.
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError>;

    /// Overwrite the mutable profile fields (email, full name, `updated_at`).
    ///
    /// Returns `false` when no live user matched.
    async fn update_profile(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Mark a live user as deleted.
    ///
    /// Returns `false` when no live user matched.
    async fn soft_delete(
        &self,
        id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError>;
}
