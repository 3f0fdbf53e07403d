//! In-process adapters for the user and article repositories.
//!
//! These back the service when no database is configured (local
//! development) and give handler tests a real store to run against. They
//! follow the same rules as the PostgreSQL adapters: soft-deleted rows are
//! invisible, uniqueness holds among live users, and listings come back
//! newest first.

mod article_repository;
mod user_repository;

pub use article_repository::InMemoryArticleRepository;
pub use user_repository::InMemoryUserRepository;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a store, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
