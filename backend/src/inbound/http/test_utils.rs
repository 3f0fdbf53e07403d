//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::web;
use chrono::{Duration, Utc};
use mockable::DefaultClock;

use crate::domain::{AccountService, ArticleService, UserId};
use crate::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};

use super::state::{HttpState, HttpStatePorts};
use super::token::{SigningKey, TokenAuthority, TokenTtl, issue_token};

const TEST_SECRET: &str = "handler-test-signing-secret";

/// Handler state backed by in-memory repositories and a fixed signing key.
pub struct TestHarness {
    key: SigningKey,
    state: web::Data<HttpState>,
}

impl TestHarness {
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let users = Arc::new(InMemoryUserRepository::default());
        let articles = Arc::new(InMemoryArticleRepository::new(users.clone()));
        let ports = HttpStatePorts::from_services(
            Arc::new(AccountService::new(users.clone(), clock.clone())),
            Arc::new(ArticleService::new(articles, users, clock.clone())),
        );
        let key = SigningKey::new(TEST_SECRET).expect("test key is non-empty");
        let tokens = TokenAuthority::new(key.clone(), TokenTtl::default(), clock);
        Self {
            key,
            state: web::Data::new(HttpState::new(ports, tokens)),
        }
    }

    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    pub fn token_for(&self, user_id: &UserId) -> String {
        issue_token(user_id, &self.key, TokenTtl::default(), Utc::now())
            .expect("token issues")
            .token
    }

    pub fn expired_token_for(&self, user_id: &UserId) -> String {
        let ttl = TokenTtl::from_hours(1).expect("ttl");
        issue_token(user_id, &self.key, ttl, Utc::now() - Duration::hours(2))
            .expect("token issues")
            .token
    }
}

/// `Authorization: Bearer <token>` header pair.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}
