//! Step definitions shared by the behaviour suites.

use std::collections::HashMap;

use actix_web::http::Method;
use actix_web::web;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, then, when};
use serde_json::{Value, json};

use scribe::inbound::http::state::HttpState;

use crate::support::{ApiCall, Reply, memory_state, send_blocking};

/// State carried between the steps of one scenario.
#[derive(Default, ScenarioState)]
pub struct ApiWorld {
    state: Slot<web::Data<HttpState>>,
    tokens: Slot<HashMap<String, String>>,
    article_path: Slot<String>,
    last: Slot<Reply>,
}

impl ApiWorld {
    fn state(&self) -> web::Data<HttpState> {
        self.state.get().expect("service started")
    }

    fn call(&self, call: ApiCall<'_>) -> Reply {
        let reply = send_blocking(&self.state(), call);
        self.last.set(reply.clone());
        reply
    }

    fn token(&self, user: &str) -> String {
        self.tokens
            .get()
            .and_then(|tokens| tokens.get(user).cloned())
            .unwrap_or_else(|| panic!("{user} has no token"))
    }

    fn remember_token(&self, user: &str, token: String) {
        let mut tokens = self.tokens.get().unwrap_or_default();
        tokens.insert(user.to_owned(), token);
        self.tokens.set(tokens);
    }

    fn article_path(&self) -> String {
        self.article_path.get().expect("an article was published")
    }

    fn last(&self) -> Reply {
        self.last.get().expect("a request was sent")
    }
}

fn registration(user: &str) -> Value {
    json!({
        "username": user,
        "email": format!("{user}@example.com"),
        "password": format!("{user}-password"),
    })
}

fn login_as(world: &ApiWorld, user: &str, password: &str) -> Reply {
    world.call(ApiCall::new(Method::POST, "/users/login").json(json!({
        "email": format!("{user}@example.com"),
        "password": password,
    })))
}

fn register(world: &ApiWorld, user: &str) -> Reply {
    world.call(ApiCall::new(Method::POST, "/users/register").json(registration(user)))
}

fn log_in(world: &ApiWorld, user: &str) {
    let reply = login_as(world, user, &format!("{user}-password"));
    assert_eq!(reply.status, 200, "login failed: {}", reply.body);
    let token = reply.body["token"].as_str().expect("token").to_owned();
    world.remember_token(user, token);
}

fn retitle_body() -> Value {
    json!({ "title": "Retitled", "content": "Revised content for the article." })
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an empty scribe service")]
fn an_empty_scribe_service(world: &ApiWorld) {
    world.state.set(memory_state());
}

#[given("{user} has registered")]
fn user_has_registered(world: &ApiWorld, user: String) {
    let reply = register(world, &user);
    assert_eq!(reply.status, 201, "registration failed: {}", reply.body);
}

#[given("{user} has logged in")]
fn user_has_logged_in(world: &ApiWorld, user: String) {
    let reply = register(world, &user);
    assert_eq!(reply.status, 201, "registration failed: {}", reply.body);
    log_in(world, &user);
}

#[given("{user} has published an article")]
fn user_has_published_an_article(world: &ApiWorld, user: String) {
    let token = world.token(&user);
    let reply = world.call(
        ApiCall::new(Method::POST, "/articles")
            .bearer(&token)
            .json(json!({ "title": "Original title", "content": "Original article content." })),
    );
    assert_eq!(reply.status, 201, "publishing failed: {}", reply.body);
    let id = reply.body["id"].as_str().expect("article id");
    world.article_path.set(format!("/articles/{id}"));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("{user} registers")]
fn user_registers(world: &ApiWorld, user: String) {
    register(world, &user);
}

#[when("{user} logs in with the right password")]
fn user_logs_in(world: &ApiWorld, user: String) {
    log_in(world, &user);
}

#[when("{user} logs in with a wrong password")]
fn user_logs_in_with_wrong_password(world: &ApiWorld, user: String) {
    login_as(world, &user, "definitely-not-it");
}

#[when("{user} requests the current profile")]
fn user_requests_profile(world: &ApiWorld, user: String) {
    let token = world.token(&user);
    world.call(ApiCall::new(Method::GET, "/users/me").bearer(&token));
}

#[when("an anonymous client requests the profile")]
fn anonymous_requests_profile(world: &ApiWorld) {
    world.call(ApiCall::new(Method::GET, "/users/me"));
}

#[when("someone registers the username {user} with another email")]
fn someone_registers_taken_username(world: &ApiWorld, user: String) {
    world.call(ApiCall::new(Method::POST, "/users/register").json(json!({
        "username": user,
        "email": "someone-else@example.com",
        "password": "another-password",
    })));
}

#[when("someone registers with the username {user}")]
fn someone_registers_with_username(world: &ApiWorld, user: String) {
    world.call(ApiCall::new(Method::POST, "/users/register").json(json!({
        "username": user,
        "email": "short@example.com",
        "password": "long-enough",
    })));
}

#[when("{user} retitles the article")]
fn user_retitles_article(world: &ApiWorld, user: String) {
    let token = world.token(&user);
    let path = world.article_path();
    world.call(
        ApiCall::new(Method::PUT, &path)
            .bearer(&token)
            .json(retitle_body()),
    );
}

#[when("{user} deletes the article")]
fn user_deletes_article(world: &ApiWorld, user: String) {
    let token = world.token(&user);
    let path = world.article_path();
    world.call(ApiCall::new(Method::DELETE, &path).bearer(&token));
}

#[when("an anonymous client fetches the article")]
fn anonymous_fetches_article(world: &ApiWorld) {
    let path = world.article_path();
    world.call(ApiCall::new(Method::GET, &path));
}

#[when("an anonymous client publishes an article")]
fn anonymous_publishes_article(world: &ApiWorld) {
    world.call(ApiCall::new(Method::POST, "/articles").json(retitle_body()));
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the response status is {status}")]
fn the_response_status_is(world: &ApiWorld, status: u16) {
    let last = world.last();
    assert_eq!(last.status, status, "unexpected body: {}", last.body);
}

#[then("the response field {field} is {value}")]
fn the_response_field_is(world: &ApiWorld, field: String, value: String) {
    let last = world.last();
    assert_eq!(last.body[field.as_str()], json!(value), "body: {}", last.body);
}

#[then("the error details name the field {field}")]
fn the_error_details_name_the_field(world: &ApiWorld, field: String) {
    let last = world.last();
    assert_eq!(last.body["details"]["field"], json!(field), "body: {}", last.body);
}
