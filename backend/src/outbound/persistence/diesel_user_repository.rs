//! PostgreSQL-backed `UserRepository`.
//!
//! Every read filters on `deleted_at IS NULL`; uniqueness is enforced by the
//! partial indexes named in [`super::schema::constraints`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserCredentialsRecord, UserPersistenceError, UserRepository};
use crate::domain::{
    Email, FullName, HashedPassword, User, UserId, UserValidationError, Username,
};

use super::diesel_error_mapping::{DieselFailure, classify, pool_message};
use super::models::{NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{constraints, users};

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_live_row<F>(&self, filter: F) -> Result<Option<UserRow>, UserPersistenceError>
    where
        F: FnOnce(users::BoxedQuery<'static, diesel::pg::Pg>) -> users::BoxedQuery<'static, diesel::pg::Pg>
            + Send,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        filter(users::table.filter(users::deleted_at.is_null()).into_boxed())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation(Some(index)) if index == constraints::USERS_USERNAME_LIVE => {
            UserPersistenceError::duplicate_username()
        }
        DieselFailure::UniqueViolation(Some(index)) if index == constraints::USERS_EMAIL_LIVE => {
            UserPersistenceError::duplicate_email()
        }
        DieselFailure::UniqueViolation(_) => UserPersistenceError::query("unique constraint violated"),
        DieselFailure::ForeignKeyViolation => UserPersistenceError::query("foreign key violated"),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn corrupt_row(id: uuid::Uuid, error: UserValidationError) -> UserPersistenceError {
    warn!(user_id = %id, %error, "stored user row failed validation");
    UserPersistenceError::query("stored user record is invalid")
}

fn row_to_user(row: UserRow) -> Result<(User, HashedPassword), UserPersistenceError> {
    let id = row.id;
    let username = Username::new(&row.username).map_err(|err| corrupt_row(id, err))?;
    let email = Email::new(&row.email).map_err(|err| corrupt_row(id, err))?;
    let full_name = FullName::new(&row.full_name).map_err(|err| corrupt_row(id, err))?;
    let user = User::new(UserId::from_uuid(id), username, email, full_name, row.created_at)
        .with_updated_at(row.updated_at);
    Ok((user, HashedPassword::from_stored(row.password_hash)))
}

fn row_to_public_user(row: Option<UserRow>) -> Result<Option<User>, UserPersistenceError> {
    row.map(|row| row_to_user(row).map(|(user, _)| user))
        .transpose()
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &HashedPassword,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            password_hash: password_hash.as_str(),
            full_name: user.full_name().as_ref(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let id = *id.as_uuid();
        row_to_public_user(self.find_live_row(move |q| q.filter(users::id.eq(id))).await?)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let username = username.as_ref().to_owned();
        row_to_public_user(
            self.find_live_row(move |q| q.filter(users::username.eq(username)))
                .await?,
        )
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let email = email.as_ref().to_owned();
        row_to_public_user(self.find_live_row(move |q| q.filter(users::email.eq(email))).await?)
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError> {
        let email = email.as_ref().to_owned();
        let row = self
            .find_live_row(move |q| q.filter(users::email.eq(email)))
            .await?;
        row.map(|row| {
            row_to_user(row).map(|(user, password_hash)| UserCredentialsRecord {
                user,
                password_hash,
            })
        })
        .transpose()
    }

    async fn update_profile(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserProfileChangeset {
            email: user.email().as_ref(),
            full_name: user.full_name().as_ref(),
            updated_at: user.updated_at(),
        };
        let updated = diesel::update(
            users::table
                .filter(users::id.eq(*user.id().as_uuid()))
                .filter(users::deleted_at.is_null()),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn soft_delete(
        &self,
        id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            users::table
                .filter(users::id.eq(*id.as_uuid()))
                .filter(users::deleted_at.is_null()),
        )
        .set((
            users::deleted_at.eq(Some(deleted_at)),
            users::updated_at.eq(deleted_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
