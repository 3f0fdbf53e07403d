//! Mapping of request validation failures onto 400 responses.
//!
//! Every rejected field produces `details: {"field", "code"}` so clients can
//! point at the offending input without parsing the message.

use std::fmt::Display;

use actix_web::web;
use serde_json::json;
use tracing::debug;

use crate::domain::{
    ArticleId, ArticleValidationError, CredentialValidationError, Error, UserValidationError,
};

/// A validation failure tied to one request field.
pub(crate) trait FieldViolation: Display {
    fn field(&self) -> &'static str;
    fn code(&self) -> &'static str;
}

macro_rules! field_violation {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FieldViolation for $ty {
                fn field(&self) -> &'static str {
                    <$ty>::field(self)
                }

                fn code(&self) -> &'static str {
                    <$ty>::code(self)
                }
            }
        )+
    };
}

field_violation!(
    UserValidationError,
    CredentialValidationError,
    ArticleValidationError,
);

pub(crate) fn invalid_field<E: FieldViolation>(error: E) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

/// Parse an article id taken from the path.
pub(crate) fn parse_article_id(raw: &str) -> Result<ArticleId, Error> {
    ArticleId::new(raw).map_err(invalid_field)
}

/// JSON extractor settings: malformed bodies become 400 `invalid_request`
/// in the standard error envelope instead of actix's plain-text reply.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request(format!("invalid request body: {err}"))
            .with_details(json!({ "field": "body", "code": "invalid_json" }))
            .into()
    })
}
