//! Bearer-token extraction for protected handlers.
//!
//! Handlers that take an [`AuthenticatedUser`] argument only run once the
//! `Authorization: Bearer <token>` header has been verified. Every failure
//! (missing header, wrong scheme, bad signature, expiry) collapses to the
//! same 401 so clients learn nothing about why a token was refused.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, error};

use crate::domain::{Error, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";
pub(crate) const UNAUTHORIZED_MESSAGE: &str = "missing or invalid bearer token";

/// Identity of the caller, resolved from a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.0
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme is matched case-insensitively; anything other than
/// `Bearer <token>` yields `None`.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        error!("HttpState missing from app data; cannot verify tokens");
        return Err(Error::internal("authentication is not configured"));
    };
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            debug!("request without a bearer token");
            Error::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;
    state
        .tokens
        .verify(token)
        .map(AuthenticatedUser)
        .map_err(|reason| {
            debug!(%reason, "bearer token rejected");
            Error::unauthorized(UNAUTHORIZED_MESSAGE)
        })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
