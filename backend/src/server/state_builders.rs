//! Builders that wire repositories into services and the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;

use scribe::domain::ports::{ArticleRepository, UserRepository};
use scribe::domain::{AccountService, ArticleService};
use scribe::inbound::http::state::{HttpState, HttpStatePorts};
use scribe::inbound::http::token::TokenAuthority;
use scribe::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};
use scribe::outbound::persistence::{DieselArticleRepository, DieselUserRepository};

use super::config::Persistence;

/// Both services over one pair of repositories.
fn ports_over<U, A>(users: Arc<U>, articles: Arc<A>, clock: Arc<dyn Clock>) -> HttpStatePorts
where
    U: UserRepository + 'static,
    A: ArticleRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(users.clone(), clock.clone()));
    let articles = Arc::new(ArticleService::new(articles, users, clock));
    HttpStatePorts::from_services(accounts, articles)
}

/// Build the handler state for the selected persistence backend.
pub(crate) fn build_http_state(
    persistence: &Persistence,
    tokens: TokenAuthority,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let ports = match persistence {
        Persistence::Postgres(pool) => ports_over(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselArticleRepository::new(pool.clone())),
            clock,
        ),
        Persistence::Memory => {
            let users = Arc::new(InMemoryUserRepository::default());
            let articles = Arc::new(InMemoryArticleRepository::new(users.clone()));
            ports_over(users, articles, clock)
        }
    };
    web::Data::new(HttpState::new(ports, tokens))
}
