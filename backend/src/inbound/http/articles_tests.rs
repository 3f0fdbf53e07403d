//! Article handlers over in-memory adapters.

use super::*;
use crate::domain::UserId;
use crate::inbound::http::api_routes;
use crate::inbound::http::test_utils::{TestHarness, bearer};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

trait TestService:
    Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

impl<S> TestService for S where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

async fn app(harness: &TestHarness) -> impl TestService {
    actix_test::init_service(
        App::new()
            .app_data(harness.state())
            .service(web::scope("/api/v1").configure(api_routes)),
    )
    .await
}

async fn json_body(response: ServiceResponse) -> Value {
    let bytes = actix_test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}

/// Register `name` and return a token for the new account.
async fn signed_up(app: &impl TestService, harness: &TestHarness, name: &str) -> (UserId, String) {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/register")
            .set_json(json!({
                "username": name,
                "email": format!("{name}@x.com"),
                "password": "secret1",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let id = UserId::new(body["user"]["id"].as_str().expect("id")).expect("uuid");
    let token = harness.token_for(&id);
    (id, token)
}

async fn create(app: &impl TestService, token: &str, title: &str) -> Value {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .insert_header(bearer(token))
            .set_json(json!({"title": title, "content": "Plenty of words in here."}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[rstest]
#[actix_web::test]
async fn create_records_the_caller_as_author() {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let (alice, token) = signed_up(&app, &harness, "alice").await;

    let article = create(&app, &token, "First post").await;

    assert_eq!(article["authorId"], json!(alice.to_string()));
    assert_eq!(article["title"], "First post");
}

#[rstest]
#[actix_web::test]
async fn create_requires_a_token() {
    let harness = TestHarness::new();
    let app = app(&harness).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .set_json(json!({"title": "First post", "content": "Plenty of words in here."}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(json!({"title": "no", "content": "Plenty of words in here."}), "title")]
#[case(json!({"title": "A fine title", "content": "short"}), "content")]
#[actix_web::test]
async fn create_validates_fields(#[case] body: Value, #[case] field: &str) {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let (_, token) = signed_up(&app, &harness, "alice").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn tokens_for_unknown_users_cannot_create() {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let token = harness.token_for(&UserId::random());

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/articles")
            .insert_header(bearer(&token))
            .set_json(json!({"title": "Ghost post", "content": "Plenty of words in here."}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("not-a-uuid", StatusCode::BAD_REQUEST)]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn get_rejects_bad_and_unknown_ids(#[case] id: &str, #[case] expected: StatusCode) {
    let harness = TestHarness::new();
    let app = app(&harness).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/articles/{id}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), expected);
    if expected == StatusCode::BAD_REQUEST {
        assert_eq!(json_body(response).await["message"], "invalid article id");
    }
}

#[rstest]
#[actix_web::test]
async fn only_the_owner_may_update_or_delete() {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let (_, alice) = signed_up(&app, &harness, "alice").await;
    let (_, bob) = signed_up(&app, &harness, "bob").await;
    let article = create(&app, &alice, "Alice's post").await;
    let uri = format!("/api/v1/articles/{}", article["id"].as_str().expect("id"));
    let revision = json!({"title": "Bob was here", "content": "Rewritten by someone else."});

    let update = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&bob))
            .set_json(&revision)
            .to_request(),
    )
    .await;
    assert_eq!(update.status(), StatusCode::FORBIDDEN);

    let delete = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&bob))
            .to_request(),
    )
    .await;
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);

    let own_update = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&alice))
            .set_json(json!({"title": "Alice's edit", "content": "Now with better prose."}))
            .to_request(),
    )
    .await;
    assert_eq!(own_update.status(), StatusCode::OK);
    assert_eq!(json_body(own_update).await["title"], "Alice's edit");

    let own_delete = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&alice))
            .to_request(),
    )
    .await;
    assert_eq!(own_delete.status(), StatusCode::OK);

    let gone =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(&uri).to_request())
            .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("?page=0&page_size=500", 1, 10)]
#[case("?page=-3&page_size=0", 1, 10)]
#[case("?page=abc&pageSize=xyz", 1, 10)]
#[case("?page=2&page_size=2", 2, 2)]
#[case("", 1, 10)]
#[actix_web::test]
async fn listing_clamps_paging(#[case] query: &str, #[case] page: u32, #[case] page_size: u32) {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let (_, token) = signed_up(&app, &harness, "alice").await;
    for n in 0..3 {
        create(&app, &token, &format!("Post number {n}")).await;
    }

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/articles{query}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], page);
    assert_eq!(body["pageSize"], page_size);
}

#[rstest]
#[actix_web::test]
async fn my_articles_lists_only_the_callers_newest_first() {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let (_, alice) = signed_up(&app, &harness, "alice").await;
    let (_, bob) = signed_up(&app, &harness, "bob").await;
    create(&app, &alice, "Alice one").await;
    create(&app, &bob, "Bob one").await;
    create(&app, &alice, "Alice two").await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/articles")
            .insert_header(bearer(&alice))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 2);
    let titles: Vec<&str> = body["articles"]
        .as_array()
        .expect("articles array")
        .iter()
        .filter_map(|article| article["title"].as_str())
        .collect();
    assert_eq!(titles, ["Alice two", "Alice one"]);
}

#[rstest]
#[actix_web::test]
async fn reads_carry_the_author_summary() {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let (alice, token) = signed_up(&app, &harness, "alice").await;
    let article = create(&app, &token, "Authored post").await;
    assert_eq!(article["author"]["username"], "alice");
    let uri = format!("/api/v1/articles/{}", article["id"].as_str().expect("id"));

    let single =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(&uri).to_request())
            .await;
    assert_eq!(single.status(), StatusCode::OK);
    let body = json_body(single).await;
    assert_eq!(body["author"]["id"], json!(alice.to_string()));
    assert_eq!(body["author"]["username"], "alice");
    assert!(body["author"].get("password").is_none());

    let listing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/articles").to_request(),
    )
    .await;
    let body = json_body(listing).await;
    assert_eq!(body["articles"][0]["author"]["email"], "alice@x.com");
}

#[rstest]
#[actix_web::test]
async fn articles_outlive_their_deleted_author() {
    let harness = TestHarness::new();
    let app = app(&harness).await;
    let (alice, token) = signed_up(&app, &harness, "alice").await;
    let article = create(&app, &token, "Orphaned post").await;
    let uri = format!("/api/v1/articles/{}", article["id"].as_str().expect("id"));

    let removed = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/users/me")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::OK);

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(&uri).to_request())
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["authorId"], json!(alice.to_string()));
    assert!(body.get("author").is_none());
}
