//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `sub` (the user id), `iat` and `exp`.
//! Expiry is checked here against an injected clock rather than by
//! `jsonwebtoken`, so tests can move time without sleeping and no leeway is
//! applied. There is no revocation; expiry is the only way a token stops
//! working.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::{Error, UserId};

use super::token_config::TokenConfigError;

const GENERATED_KEY_BYTES: usize = 32;
const FINGERPRINT_BYTES: usize = 8;

/// Shared HMAC secret used to sign and verify tokens.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Wrap a configured secret.
    ///
    /// # Errors
    ///
    /// Returns [`TokenConfigError::EmptySigningKey`] for an empty or
    /// whitespace-only secret; such a key would make tokens forgeable.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, TokenConfigError> {
        let secret = Zeroizing::new(secret.into());
        if secret.iter().all(u8::is_ascii_whitespace) {
            return Err(TokenConfigError::EmptySigningKey);
        }
        Ok(Self(secret))
    }

    /// A random key that lives only as long as the process.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new(vec![0_u8; GENERATED_KEY_BYTES]);
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// First eight bytes of the key's SHA-256 digest, hex encoded.
    ///
    /// Safe to log; lets operators tell which key a process is using.
    ///
    /// ```
    /// use scribe::inbound::http::token::SigningKey;
    ///
    /// let key = SigningKey::new("correct horse battery staple").expect("non-empty");
    /// assert_eq!(key.fingerprint().len(), 16);
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_slice());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.0)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.0)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Token lifetime in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtl(u32);

impl TokenTtl {
    /// Lifetime used when none is configured.
    pub const DEFAULT_HOURS: u32 = 24;
    /// Longest accepted lifetime, one year.
    pub const MAX_HOURS: u32 = 24 * 365;

    /// # Errors
    ///
    /// Returns [`TokenConfigError::ZeroTtl`] when `hours` is zero and
    /// [`TokenConfigError::TtlTooLong`] above [`Self::MAX_HOURS`].
    pub fn from_hours(hours: u32) -> Result<Self, TokenConfigError> {
        if hours == 0 {
            return Err(TokenConfigError::ZeroTtl);
        }
        if hours > Self::MAX_HOURS {
            return Err(TokenConfigError::TtlTooLong {
                max: Self::MAX_HOURS,
            });
        }
        Ok(Self(hours))
    }

    #[must_use]
    pub const fn hours(self) -> u32 {
        self.0
    }

    fn as_duration(self) -> Duration {
        Duration::hours(i64::from(self.0))
    }
}

impl Default for TokenTtl {
    fn default() -> Self {
        Self(Self::DEFAULT_HOURS)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// The `exp` claim as a timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Why a token was refused or could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signed with a different key.
    #[error("token signature does not match")]
    InvalidSignature,
    /// Not a decodable HS256 token.
    #[error("token is malformed")]
    Malformed,
    /// `exp` is at or before the verification instant.
    #[error("token has expired")]
    Expired,
    /// `sub` is missing or not a UUID.
    #[error("token subject is not a user id")]
    InvalidSubject,
    /// The token could not be produced.
    #[error("failed to sign token: {message}")]
    Signing {
        /// Encoder or expiry detail.
        message: String,
    },
}

/// Sign a token for `user_id` valid for `ttl` from `issued_at`.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if the expiry is out of range or
/// encoding fails.
pub fn issue_token(
    user_id: &UserId,
    key: &SigningKey,
    ttl: TokenTtl,
    issued_at: DateTime<Utc>,
) -> Result<IssuedToken, TokenError> {
    let expires_at = issued_at
        .checked_add_signed(ttl.as_duration())
        .ok_or_else(|| TokenError::Signing {
            message: "token expiry is out of range".to_owned(),
        })?;
    let claims = Claims {
        sub: user_id.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &key.encoding_key()).map_err(
        |err| TokenError::Signing {
            message: err.to_string(),
        },
    )?;
    // Report the expiry at the precision the claim actually carries.
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .unwrap_or(expires_at);
    Ok(IssuedToken { token, expires_at })
}

/// Check the signature and expiry of `token` and return its subject.
///
/// A token is expired once `now` reaches its `exp` second.
///
/// # Errors
///
/// See [`TokenError`]; every variant except `Signing` can be returned.
pub fn verify_token(token: &str, key: &SigningKey, now: DateTime<Utc>) -> Result<UserId, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(token, &key.decoding_key(), &validation).map_err(map_jwt_error)?;
    if now.timestamp() >= data.claims.exp {
        return Err(TokenError::Expired);
    }
    UserId::new(&data.claims.sub).map_err(|_| TokenError::InvalidSubject)
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => TokenError::InvalidSubject,
        _ => TokenError::Malformed,
    }
}

/// Key, lifetime and clock bundled for handlers.
#[derive(Clone)]
pub struct TokenAuthority {
    key: SigningKey,
    ttl: TokenTtl,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    pub fn new(key: SigningKey, ttl: TokenTtl, clock: Arc<dyn Clock>) -> Self {
        Self { key, ttl, clock }
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        self.key.fingerprint()
    }

    /// Issue a token for `user_id` starting now.
    ///
    /// # Errors
    ///
    /// Signing failures surface as an internal error.
    pub fn issue(&self, user_id: &UserId) -> Result<IssuedToken, Error> {
        issue_token(user_id, &self.key, self.ttl, self.clock.utc())
            .map_err(|err| Error::internal(err.to_string()))
    }

    /// Verify `token` against the current time.
    ///
    /// # Errors
    ///
    /// Returns the [`TokenError`] describing the rejection.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        verify_token(token, &self.key, self.clock.utc())
    }
}

impl fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
