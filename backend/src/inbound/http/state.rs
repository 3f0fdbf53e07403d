//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against in-memory adapters or mocks.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, ArticleCommand, ArticleQuery, ArticleRepository, UserRepository,
};
use crate::domain::{AccountService, ArticleService};

use super::token::TokenAuthority;

/// The driving ports the handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub account_query: Arc<dyn AccountQuery>,
    pub articles: Arc<dyn ArticleCommand>,
    pub article_query: Arc<dyn ArticleQuery>,
}

impl HttpStatePorts {
    /// Expose both services through every port they implement.
    pub fn from_services<U, A>(
        accounts: Arc<AccountService<U>>,
        articles: Arc<ArticleService<A, U>>,
    ) -> Self
    where
        U: UserRepository + 'static,
        A: ArticleRepository + 'static,
    {
        Self {
            accounts: accounts.clone(),
            account_query: accounts,
            articles: articles.clone(),
            article_query: articles,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub account_query: Arc<dyn AccountQuery>,
    pub articles: Arc<dyn ArticleCommand>,
    pub article_query: Arc<dyn ArticleQuery>,
    pub tokens: Arc<TokenAuthority>,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts, tokens: TokenAuthority) -> Self {
        let HttpStatePorts {
            accounts,
            account_query,
            articles,
            article_query,
        } = ports;
        Self {
            accounts,
            account_query,
            articles,
            article_query,
            tokens: Arc::new(tokens),
        }
    }
}
