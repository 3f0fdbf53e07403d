//! Driving port for account reads.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Fetch a live user or fail with `not_found`.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}
