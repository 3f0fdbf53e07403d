//! PostgreSQL persistence adapters.
//!
//! Repositories translate between Diesel rows and domain types and nothing
//! else. Row structs and the table definitions stay private to this module;
//! every driver error is mapped onto the port's own error type.
//!
//! ```ignore
//! use scribe::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/scribe")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_article_repository;
mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
