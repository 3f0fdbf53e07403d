//! Backend entry-point: loads configuration, selects storage, and serves the
//! REST API with health probes and OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use scribe::inbound::http::health::HealthState;
use scribe::inbound::http::token::TokenAuthority;
use scribe::inbound::http::token_config::{BuildMode, token_settings_from_env};
use scribe::outbound::persistence::{DbPool, run_pending_migrations};
use server::{Persistence, ServerConfig, ServerSettings, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!(error = %err, "{context}");
    std::io::Error::other(format!("{context}: {err}"))
}

async fn select_persistence(settings: &ServerSettings) -> std::io::Result<Persistence> {
    let (Some(database_url), Some(pool_config)) = (settings.database_url(), settings.pool_config())
    else {
        warn!("no database configured; data is kept in memory and lost on exit");
        return Ok(Persistence::Memory);
    };
    run_pending_migrations(database_url)
        .await
        .map_err(|err| startup_error("failed to apply database migrations", err))?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| startup_error("failed to create database pool", err))?;
    info!(
        max_connections = settings.db_max_connections,
        "connected to PostgreSQL"
    );
    Ok(Persistence::Postgres(pool))
}

/// Flip the health probes to draining as soon as a stop signal arrives.
fn drain_on_signal(health_state: web::Data<HealthState>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("stop signal received; draining");
                health_state.mark_draining();
            }
            Err(err) => warn!(error = %err, "failed to listen for stop signal"),
        }
    });
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| startup_error("failed to load server settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid bind address", err))?;

    let env = DefaultEnv::new();
    let token_settings = token_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(|err| startup_error("invalid token configuration", err))?;
    info!(
        fingerprint = %token_settings.key.fingerprint(),
        ttl_hours = token_settings.ttl.hours(),
        ephemeral = token_settings.ephemeral,
        "token signing key loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = TokenAuthority::new(token_settings.key, token_settings.ttl, clock.clone());
    let persistence = select_persistence(&settings).await?;

    let config = ServerConfig::new(bind_addr, persistence)
        .with_timeouts(settings.request_timeout(), settings.shutdown_timeout_secs);
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config, tokens, clock)?;
    drain_on_signal(health_state);
    info!(%bind_addr, "listening");
    server.await
}
