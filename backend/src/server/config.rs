//! Server settings loaded via OrthoConfig and the runtime configuration
//! derived from them.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use scribe::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Values read from `SCRIBE_*` environment variables, CLI flags, or a
/// configuration file.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCRIBE")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection URL. Without it the service keeps its data in
    /// process memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Seconds a client has to send its request head.
    #[ortho_config(default = 5)]
    pub request_timeout_secs: u64,
    /// Seconds in-flight requests get to finish after a stop signal.
    #[ortho_config(default = 5)]
    pub shutdown_timeout_secs: u64,
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("shutdown_timeout_secs", &self.shutdown_timeout_secs)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind host '{host}': expected an IP address")]
    InvalidHost { host: String },
}

impl ServerSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Socket address assembled from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host().trim();
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Pool settings for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url().map(|url| {
            PoolConfig::new(url).with_max_size(self.db_max_connections)
        })
    }
}

/// Where the repositories keep their data.
#[derive(Clone)]
pub enum Persistence {
    Postgres(DbPool),
    Memory,
}

/// Everything [`super::create_server`] needs besides the token authority.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) persistence: Persistence,
    pub(crate) request_timeout: Duration,
    pub(crate) shutdown_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, persistence: Persistence) -> Self {
        Self {
            bind_addr,
            persistence,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, request_timeout: Duration, shutdown_timeout_secs: u64) -> Self {
        self.request_timeout = request_timeout;
        self.shutdown_timeout_secs = shutdown_timeout_secs;
        self
    }
}
