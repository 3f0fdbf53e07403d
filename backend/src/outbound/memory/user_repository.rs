//! In-memory `UserRepository` adapter.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::lock;
use crate::domain::ports::{UserCredentialsRecord, UserPersistenceError, UserRepository};
use crate::domain::{Email, HashedPassword, User, UserId, Username};

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: HashedPassword,
    deleted_at: Option<DateTime<Utc>>,
}

impl StoredUser {
    const fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}

/// User directory held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    fn find_live<P>(&self, predicate: P) -> Option<StoredUser>
    where
        P: Fn(&User) -> bool,
    {
        lock(&self.rows)
            .iter()
            .find(|row| row.is_live() && predicate(&row.user))
            .cloned()
    }

    /// Live user with `id`, for adapters that attach authors to their rows.
    pub(super) fn live_user(&self, id: &UserId) -> Option<User> {
        self.find_live(|user| user.id() == id).map(|row| row.user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &HashedPassword,
    ) -> Result<(), UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let live = || rows.iter().filter(|row| row.is_live());
        if live().any(|row| row.user.username() == user.username()) {
            return Err(UserPersistenceError::duplicate_username());
        }
        if live().any(|row| row.user.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email());
        }
        if rows.iter().any(|row| row.user.id() == user.id()) {
            return Err(UserPersistenceError::query(format!(
                "user {} already exists",
                user.id()
            )));
        }
        rows.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.clone(),
            deleted_at: None,
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.live_user(id))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .find_live(|user| user.username() == username)
            .map(|row| row.user))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.find_live(|user| user.email() == email).map(|row| row.user))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError> {
        Ok(self
            .find_live(|user| user.email() == email)
            .map(|row| UserCredentialsRecord {
                user: row.user,
                password_hash: row.password_hash,
            }))
    }

    async fn update_profile(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let clash = rows.iter().any(|row| {
            row.is_live() && row.user.id() != user.id() && row.user.email() == user.email()
        });
        if clash {
            return Err(UserPersistenceError::duplicate_email());
        }
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.is_live() && row.user.id() == user.id())
        else {
            return Ok(false);
        };
        row.user = user.clone();
        Ok(true)
    }

    async fn soft_delete(
        &self,
        id: &UserId,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|row| row.is_live() && row.user.id() == id);
        Ok(row.is_some_and(|row| {
            row.deleted_at = Some(deleted_at);
            true
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::FullName;
    use rstest::{fixture, rstest};

    fn user(username: &str, email: &str) -> User {
        User::new(
            UserId::random(),
            Username::new(username).expect("valid username"),
            Email::new(email).expect("valid email"),
            FullName::default(),
            Utc::now(),
        )
    }

    #[fixture]
    fn digest() -> HashedPassword {
        HashedPassword::from_stored("$argon2id$fixture")
    }

    #[rstest]
    #[tokio::test]
    async fn enforces_uniqueness_among_live_users(digest: HashedPassword) {
        let repo = InMemoryUserRepository::default();
        repo.insert(&user("alice", "alice@x.com"), &digest)
            .await
            .expect("first insert succeeds");

        let same_name = repo.insert(&user("alice", "other@x.com"), &digest).await;
        assert_eq!(same_name, Err(UserPersistenceError::DuplicateUsername));

        let same_email = repo.insert(&user("other", "alice@x.com"), &digest).await;
        assert_eq!(same_email, Err(UserPersistenceError::DuplicateEmail));
    }

    #[rstest]
    #[tokio::test]
    async fn soft_deleted_users_are_invisible_and_release_their_names(digest: HashedPassword) {
        let repo = InMemoryUserRepository::default();
        let alice = user("alice", "alice@x.com");
        repo.insert(&alice, &digest).await.expect("insert succeeds");

        assert!(repo.soft_delete(alice.id(), Utc::now()).await.expect("delete"));
        assert!(!repo.soft_delete(alice.id(), Utc::now()).await.expect("delete"));

        assert_eq!(repo.find_by_id(alice.id()).await.expect("lookup"), None);
        assert_eq!(repo.find_by_username(alice.username()).await.expect("lookup"), None);
        assert!(
            repo.find_credentials_by_email(alice.email())
                .await
                .expect("lookup")
                .is_none()
        );

        repo.insert(&user("alice", "alice@x.com"), &digest)
            .await
            .expect("name is free again");
    }

    #[rstest]
    #[tokio::test]
    async fn update_profile_touches_only_live_rows(digest: HashedPassword) {
        let repo = InMemoryUserRepository::default();
        let alice = user("alice", "alice@x.com");
        repo.insert(&alice, &digest).await.expect("insert succeeds");

        let stranger = user("ghost", "ghost@x.com");
        assert!(!repo.update_profile(&stranger).await.expect("update runs"));
        assert!(repo.update_profile(&alice).await.expect("update runs"));
    }
}
