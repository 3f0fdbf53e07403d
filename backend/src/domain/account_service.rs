//! Account domain service.
//!
//! Implements registration, sign-in, profile reads and updates, and account
//! removal on top of a [`UserRepository`]. Password hashing runs on the
//! blocking pool so the async executor stays responsive.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{AccountCommand, AccountQuery, UserPersistenceError, UserRepository};
use crate::domain::{
    Error, LoginCredentials, ProfileUpdate, Registration, User, UserId, hash_password_off_thread,
    verify_password_off_thread,
};

/// Typed account failures surfaced by [`AccountService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// Another live user holds the username.
    #[error("username already exists")]
    DuplicateUsername,
    /// Another live user holds the email.
    #[error("email already exists")]
    DuplicateEmail,
    /// Unknown email or wrong password; deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// The user does not exist or has been deleted.
    #[error("user not found")]
    UserNotFound,
}

impl From<AccountError> for Error {
    fn from(value: AccountError) -> Self {
        let message = value.to_string();
        match value {
            AccountError::DuplicateUsername => Error::conflict(message)
                .with_details(json!({ "field": "username", "code": "duplicate_username" })),
            AccountError::DuplicateEmail => Error::conflict(message)
                .with_details(json!({ "field": "email", "code": "duplicate_email" })),
            AccountError::InvalidCredentials => Error::unauthorized(message),
            AccountError::UserNotFound => Error::not_found(message),
        }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(error = %message, "user repository unavailable");
            Error::service_unavailable("user repository unavailable")
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => AccountError::DuplicateUsername.into(),
        UserPersistenceError::DuplicateEmail => AccountError::DuplicateEmail.into(),
    }
}

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AccountService<R> {
    /// Create a service over a user repository.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use scribe::domain::AccountService;
    /// use scribe::outbound::memory::InMemoryUserRepository;
    ///
    /// let service = AccountService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(users: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    async fn load(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| AccountError::UserNotFound.into())
    }
}

#[async_trait]
impl<R> AccountCommand for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let Registration {
            username,
            email,
            password,
            full_name,
        } = registration;

        let username_taken = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_persistence_error)?
            .is_some();
        if username_taken {
            return Err(AccountError::DuplicateUsername.into());
        }

        let email_taken = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_persistence_error)?
            .is_some();
        if email_taken {
            return Err(AccountError::DuplicateEmail.into());
        }

        let password_hash = hash_password_off_thread(password).await.map_err(|err| {
            error!(error = %err, "password hashing failed");
            Error::internal("failed to secure password")
        })?;

        let user = User::new(
            UserId::random(),
            username,
            email,
            full_name,
            self.clock.utc(),
        );
        // The storage unique indexes remain the authority when two
        // registrations race past the checks above.
        self.users
            .insert(&user, &password_hash)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), "account registered");
        Ok(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let record = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_persistence_error)?;
        let Some(record) = record else {
            return Err(AccountError::InvalidCredentials.into());
        };

        let candidate = Zeroizing::new(credentials.password().to_owned());
        if !verify_password_off_thread(candidate, record.password_hash).await {
            return Err(AccountError::InvalidCredentials.into());
        }
        Ok(record.user)
    }

    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error> {
        let mut user = self.load(user_id).await?;

        if let Some(email) = update.email.as_ref().filter(|email| *email != user.email()) {
            let holder = self
                .users
                .find_by_email(email)
                .await
                .map_err(map_persistence_error)?;
            if holder.is_some_and(|other| other.id() != user.id()) {
                return Err(AccountError::DuplicateEmail.into());
            }
        }

        if !user.apply(update, self.clock.utc()) {
            return Ok(user);
        }

        let updated = self
            .users
            .update_profile(&user)
            .await
            .map_err(map_persistence_error)?;
        if !updated {
            return Err(AccountError::UserNotFound.into());
        }
        Ok(user)
    }

    async fn delete_account(&self, user_id: &UserId) -> Result<(), Error> {
        let deleted = self
            .users
            .soft_delete(user_id, self.clock.utc())
            .await
            .map_err(map_persistence_error)?;
        if !deleted {
            return Err(AccountError::UserNotFound.into());
        }
        info!(user_id = %user_id, "account deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> AccountQuery for AccountService<R>
where
    R: UserRepository,
{
    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load(user_id).await
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
