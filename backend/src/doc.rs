//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST handler under `/api/v1`, the health probes,
//! and the request/response schemas they reference. Protected operations
//! declare the `bearer` scheme, which [`SecurityAddon`] registers as an HTTP
//! bearer token in JWT format.
//!
//! The document backs Swagger UI in debug builds and is printed by
//! `cargo run --bin openapi-dump`.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::articles::ArticleRequest;
use crate::inbound::http::schemas::{
    ArticleList, ArticleResponse, LoginResponse, RegisterResponse, UserProfile, UserSummary,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name under which the bearer scheme is registered.
pub const BEARER_SCHEME: &str = "bearer";

/// Adds the bearer token security scheme to the generated components.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/users/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Scribe API",
        description = "User accounts with token authentication and an article catalogue."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::delete_current_user,
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::articles::list_my_articles,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        ArticleRequest,
        UserSummary,
        UserProfile,
        RegisterResponse,
        LoginResponse,
        ArticleResponse,
        ArticleList,
    )),
    tags(
        (name = "users", description = "Registration, login and the caller's profile"),
        (name = "articles", description = "Article catalogue"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
