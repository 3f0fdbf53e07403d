//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{Persistence, ServerConfig, ServerSettings};

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::Clock;

use scribe::Trace;
#[cfg(debug_assertions)]
use scribe::doc::ApiDoc;
use scribe::inbound::http::api_routes;
use scribe::inbound::http::health::{HealthState, live, ready};
use scribe::inbound::http::state::HttpState;
use scribe::inbound::http::token::TokenAuthority;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(api_routes))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and mark the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    tokens: TokenAuthority,
    clock: Arc<dyn Clock>,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        persistence,
        request_timeout,
        shutdown_timeout_secs,
    } = config;
    let http_state = build_http_state(&persistence, tokens, clock);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .client_request_timeout(request_timeout)
    .shutdown_timeout(shutdown_timeout_secs)
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
