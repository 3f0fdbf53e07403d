//! Token settings read from the process environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `JWT_SECRET` | signing secret |
//! | `JWT_SECRET_FILE` | path to a file holding the secret (used when `JWT_SECRET` is unset) |
//! | `JWT_EXPIRATION_HOURS` | token lifetime, default 24, at most 8760 |
//!
//! Debug builds tolerate a missing secret or a bad lifetime, warning and
//! falling back. Release builds refuse to start. An empty secret is fatal in
//! both.

use std::path::PathBuf;

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

use super::token::{SigningKey, TokenTtl};

pub(crate) const SECRET_ENV: &str = "JWT_SECRET";
pub(crate) const SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
pub(crate) const EXPIRATION_HOURS_ENV: &str = "JWT_EXPIRATION_HOURS";
const HOURS_EXPECTED: &str = "a whole number of hours from 1 to 8760";

/// Whether configuration problems are tolerated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    ///
    /// ```
    /// use scribe::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated token configuration.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub key: SigningKey,
    pub ttl: TokenTtl,
    /// True when no secret was configured and a random key is in use.
    pub ephemeral: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenConfigError {
    #[error("signing key must not be empty")]
    EmptySigningKey,
    #[error("token lifetime must be at least one hour")]
    ZeroTtl,
    #[error("token lifetime must be at most {max} hours")]
    TtlTooLong { max: u32 },
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read signing key at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Build token settings from `env` under `mode`.
///
/// # Errors
///
/// Returns [`TokenConfigError`] for an empty secret in any mode, and for a
/// missing secret or unparsable lifetime in release mode.
///
/// ```
/// use mockable::MockEnv;
/// use scribe::inbound::http::token_config::{BuildMode, token_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("a-long-random-secret".to_owned()),
///     "JWT_EXPIRATION_HOURS" => Some("2".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.ttl.hours(), 2);
/// assert!(!settings.ephemeral);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let ttl = ttl_from_env(env, mode)?;
    let (key, ephemeral) = match secret_from_env(env)? {
        Some(secret) => (SigningKey::new(secret.as_bytes())?, false),
        None if mode.is_debug() => {
            warn!("JWT_SECRET not set; using a temporary signing key (dev only)");
            (SigningKey::generate(), true)
        }
        None => return Err(TokenConfigError::MissingEnv { name: SECRET_ENV }),
    };
    Ok(TokenSettings { key, ttl, ephemeral })
}

fn secret_from_env<E: Env>(env: &E) -> Result<Option<Zeroizing<String>>, TokenConfigError> {
    if let Some(secret) = env.string(SECRET_ENV) {
        return Ok(Some(Zeroizing::new(secret)));
    }
    let Some(path) = env.string(SECRET_FILE_ENV) else {
        return Ok(None);
    };
    let path = PathBuf::from(path);
    std::fs::read_to_string(&path)
        .map(|contents| Some(Zeroizing::new(contents.trim_end_matches(['\r', '\n']).to_owned())))
        .map_err(|source| TokenConfigError::SecretRead { path, source })
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<TokenTtl, TokenConfigError> {
    let Some(value) = env.string(EXPIRATION_HOURS_ENV) else {
        return Ok(TokenTtl::default());
    };
    let parsed = value.trim().parse::<u32>().ok().map(TokenTtl::from_hours);
    match parsed {
        Some(Ok(ttl)) => Ok(ttl),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid JWT_EXPIRATION_HOURS; using default");
            Ok(TokenTtl::default())
        }
        _ => Err(TokenConfigError::InvalidEnv {
            name: EXPIRATION_HOURS_ENV,
            value,
            expected: HOURS_EXPECTED,
        }),
    }
}

#[cfg(test)]
#[path = "token_config_tests.rs"]
mod tests;
