//! Shared harness for HTTP-level integration tests.
//!
//! Every request builds a fresh `App` over the same [`HttpState`], so data
//! written by one call is visible to the next without keeping a service
//! instance alive between test steps.

use std::sync::Arc;

use actix_web::http::Method;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use serde_json::Value;

use scribe::Trace;
use scribe::domain::{AccountService, ArticleService};
use scribe::inbound::http::api_routes;
use scribe::inbound::http::state::{HttpState, HttpStatePorts};
use scribe::inbound::http::token::{SigningKey, TokenAuthority, TokenTtl};
use scribe::outbound::memory::{InMemoryArticleRepository, InMemoryUserRepository};

pub const TEST_SECRET: &str = "integration-test-signing-secret";

/// Handler state over empty in-memory stores.
pub fn memory_state() -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(InMemoryUserRepository::default());
    let articles = Arc::new(InMemoryArticleRepository::new(users.clone()));
    let ports = HttpStatePorts::from_services(
        Arc::new(AccountService::new(users.clone(), clock.clone())),
        Arc::new(ArticleService::new(articles, users, clock.clone())),
    );
    let key = SigningKey::new(TEST_SECRET).expect("test key is non-empty");
    let tokens = TokenAuthority::new(key, TokenTtl::default(), clock);
    web::Data::new(HttpState::new(ports, tokens))
}

/// Status and decoded body of one exchange. Empty bodies decode to `Null`.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

/// A request against `/api/v1`.
pub struct ApiCall<'a> {
    pub method: Method,
    pub path: &'a str,
    pub token: Option<&'a str>,
    pub body: Option<Value>,
}

impl<'a> ApiCall<'a> {
    pub fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            token: None,
            body: None,
        }
    }

    pub fn bearer(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Send `call` through a freshly built application.
pub async fn send(state: &web::Data<HttpState>, call: ApiCall<'_>) -> Reply {
    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(api_routes)),
    )
    .await;

    let mut request = test::TestRequest::default()
        .method(call.method)
        .uri(&format!("/api/v1{}", call.path));
    if let Some(token) = call.token {
        request = request.insert_header((AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(body) = call.body {
        request = request.set_json(body);
    }

    let res = test::call_service(&app, request.to_request()).await;
    let status = res.status().as_u16();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };
    Reply { status, body }
}

/// Blocking wrapper for synchronous step functions.
pub fn send_blocking(state: &web::Data<HttpState>, call: ApiCall<'_>) -> Reply {
    actix_rt::System::new().block_on(send(state, call))
}
