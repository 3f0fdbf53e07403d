//! Driving port for account mutations and sign-in.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, ProfileUpdate, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account. Username is checked before email.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check credentials and return the matching user.
    ///
    /// Every failure is the same `unauthorized` error so callers cannot
    /// learn whether the email exists.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Change the caller's email and/or full name.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error>;

    /// Soft-delete the caller's account.
    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error>;
}
