//! Environment parsing for token settings.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use std::io::Write;

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

struct SecretFile {
    path: PathBuf,
}

impl SecretFile {
    fn containing(contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("jwt-secret-{}", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).expect("create secret file");
        file.write_all(contents.as_bytes()).expect("write secret file");
        Self { path }
    }

    fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for SecretFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[rstest]
fn explicit_secret_and_lifetime_are_used() {
    let env = mock_env(&[(SECRET_ENV, "s3cret"), (EXPIRATION_HOURS_ENV, "6")]);

    let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert_eq!(settings.ttl.hours(), 6);
    assert!(!settings.ephemeral);
    assert_eq!(
        settings.key.fingerprint(),
        SigningKey::new("s3cret").expect("key").fingerprint()
    );
}

#[rstest]
#[case(BuildMode::Debug)]
#[case(BuildMode::Release)]
fn empty_secret_is_always_fatal(#[case] mode: BuildMode) {
    let env = mock_env(&[(SECRET_ENV, "   ")]);

    let err = token_settings_from_env(&env, mode).expect_err("empty secret");

    assert!(matches!(err, TokenConfigError::EmptySigningKey));
}

#[rstest]
fn release_requires_a_secret() {
    let env = mock_env(&[]);

    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("missing secret");

    assert!(matches!(
        err,
        TokenConfigError::MissingEnv { name: SECRET_ENV }
    ));
}

#[rstest]
fn debug_falls_back_to_ephemeral_key() {
    let env = mock_env(&[]);

    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug fallback");

    assert!(settings.ephemeral);
    assert_eq!(settings.ttl, TokenTtl::default());
}

#[rstest]
#[case("0")]
#[case("soon")]
#[case("-4")]
#[case("8761")]
#[case("4294967295")]
fn release_rejects_bad_lifetimes(#[case] raw: &str) {
    let env = mock_env(&[(SECRET_ENV, "s3cret"), (EXPIRATION_HOURS_ENV, raw)]);

    let err = token_settings_from_env(&env, BuildMode::Release).expect_err("bad lifetime");

    assert!(matches!(
        err,
        TokenConfigError::InvalidEnv {
            name: EXPIRATION_HOURS_ENV,
            ..
        }
    ));
}

#[rstest]
fn longest_lifetime_is_accepted() {
    let env = mock_env(&[(SECRET_ENV, "s3cret"), (EXPIRATION_HOURS_ENV, "8760")]);

    let settings = token_settings_from_env(&env, BuildMode::Release).expect("one year");

    assert_eq!(settings.ttl.hours(), TokenTtl::MAX_HOURS);
}

#[rstest]
#[case("0")]
#[case("4294967295")]
fn debug_replaces_bad_lifetime_with_default(#[case] raw: &str) {
    let env = mock_env(&[(SECRET_ENV, "s3cret"), (EXPIRATION_HOURS_ENV, raw)]);

    let settings = token_settings_from_env(&env, BuildMode::Debug).expect("debug fallback");

    assert_eq!(settings.ttl.hours(), TokenTtl::DEFAULT_HOURS);
}

#[rstest]
fn secret_file_is_read_when_variable_is_unset() {
    let file = SecretFile::containing("from-a-file\n");
    let path = file.path_str();
    let env = mock_env(&[(SECRET_FILE_ENV, path.as_str())]);

    let settings = token_settings_from_env(&env, BuildMode::Release).expect("file secret");

    assert_eq!(
        settings.key.fingerprint(),
        SigningKey::new("from-a-file").expect("key").fingerprint()
    );
}

#[rstest]
fn unreadable_secret_file_is_reported() {
    let missing = std::env::temp_dir().join(format!("absent-{}", uuid::Uuid::new_v4()));
    let path = missing.to_string_lossy().into_owned();
    let env = mock_env(&[(SECRET_FILE_ENV, path.as_str())]);

    let err = token_settings_from_env(&env, BuildMode::Debug).expect_err("unreadable file");

    assert!(matches!(err, TokenConfigError::SecretRead { .. }));
}
