//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters.
//! Driving ports (`*Command`, `*Query`) are implemented by the domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod article_command;
mod article_query;
mod article_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use article_command::MockArticleCommand;
pub use article_command::ArticleCommand;
#[cfg(test)]
pub use article_query::MockArticleQuery;
pub use article_query::ArticleQuery;
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticlePersistenceError, ArticleRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentialsRecord, UserPersistenceError, UserRepository};
