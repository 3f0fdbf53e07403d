//! Credential store: one-way password hashing and verification.
//!
//! Digests are Argon2id PHC strings with a random per-password salt and the
//! crate's default cost parameters. Verification never reports *why* it
//! failed; a malformed stored digest is indistinguishable from a mismatch.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::{Password, TraceId};

/// Stored password digest in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap a digest loaded from storage.
    #[must_use]
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The PHC string for persisting.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword(<redacted>)")
    }
}

/// Failures raised while producing a digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hashing primitive rejected its input or parameters.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
    /// The blocking worker running the hash panicked or was cancelled.
    #[error("password hashing worker failed: {message}")]
    Worker { message: String },
}

/// Hash `password` with a fresh random salt.
///
/// # Examples
/// ```
/// use scribe::domain::{Password, hash_password, verify_password};
///
/// let password = Password::new("secret1").unwrap();
/// let digest = hash_password(&password).unwrap();
/// assert!(verify_password("secret1", &digest));
/// assert!(!verify_password("secret2", &digest));
/// ```
pub fn hash_password(password: &Password) -> Result<HashedPassword, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|digest| HashedPassword(digest.to_string()))
        .map_err(|err| PasswordHashError::Hashing {
            message: err.to_string(),
        })
}

/// Check `candidate` against a stored digest.
///
/// Returns `false` for mismatches and for digests that cannot be parsed.
#[must_use]
pub fn verify_password(candidate: &str, hashed: &HashedPassword) -> bool {
    PasswordHash::new(hashed.as_str()).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Run [`hash_password`] on the blocking pool.
pub async fn hash_password_off_thread(password: Password) -> Result<HashedPassword, PasswordHashError> {
    let work = TraceId::in_current_scope(move || hash_password(&password));
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| PasswordHashError::Worker {
            message: err.to_string(),
        })?
}

/// Run [`verify_password`] on the blocking pool.
///
/// A failed worker counts as a failed verification.
pub async fn verify_password_off_thread(candidate: Zeroizing<String>, hashed: HashedPassword) -> bool {
    let work = TraceId::in_current_scope(move || verify_password(&candidate, &hashed));
    tokio::task::spawn_blocking(work).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn password(raw: &str) -> Password {
        Password::new(raw).expect("fixture password satisfies policy")
    }

    #[rstest]
    #[case("secret1")]
    #[case("  spaced out  ")]
    #[case("pässwörd-ünïcode")]
    fn round_trips(#[case] raw: &str) {
        let digest = hash_password(&password(raw)).expect("hashing succeeds");
        assert!(verify_password(raw, &digest));
    }

    #[rstest]
    #[case("secret1", "secret2")]
    #[case("secret1", "Secret1")]
    #[case("secret1", "secret1 ")]
    fn rejects_other_passwords(#[case] stored: &str, #[case] attempt: &str) {
        let digest = hash_password(&password(stored)).expect("hashing succeeds");
        assert!(!verify_password(attempt, &digest));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-phc-string")]
    #[case("$argon2id$v=19$m=19456,t=2,p=1$broken")]
    fn malformed_digests_fail_verification(#[case] stored: &str) {
        let digest = HashedPassword::from_stored(stored);
        assert!(!verify_password("secret1", &digest));
    }

    #[rstest]
    fn salts_differ_between_hashes() {
        let first = hash_password(&password("secret1")).expect("hashing succeeds");
        let second = hash_password(&password("secret1")).expect("hashing succeeds");
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("$argon2id$"));
    }

    #[rstest]
    fn debug_hides_digest() {
        let digest = hash_password(&password("secret1")).expect("hashing succeeds");
        assert_eq!(format!("{digest:?}"), "HashedPassword(<redacted>)");
    }

    #[tokio::test]
    async fn off_thread_helpers_round_trip() {
        let digest = hash_password_off_thread(password("secret1"))
            .await
            .expect("hashing succeeds");
        assert!(verify_password_off_thread(Zeroizing::new("secret1".to_owned()), digest.clone()).await);
        assert!(!verify_password_off_thread(Zeroizing::new("nope".to_owned()), digest).await);
    }
}
