//! Account handlers.
//!
//! ```text
//! POST   /api/v1/users/register {"username","email","password","fullName"}
//! POST   /api/v1/users/login    {"email","password"}
//! GET    /api/v1/users/me
//! PUT    /api/v1/users/me       {"fullName"?, "email"?}
//! DELETE /api/v1/users/me
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    CredentialValidationError, Email, Error, FullName, LoginCredentials, Password,
    ProfileUpdate, Registration, UserValidationError, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{LoginResponse, RegisterResponse, UserProfile};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::invalid_field;

/// Body of `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
    #[serde(default, alias = "full_name")]
    pub full_name: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = CredentialValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::new(&value.username)?,
            email: Email::new(&value.email)?,
            password: Password::new(value.password)?,
            full_name: value
                .full_name
                .as_deref()
                .map(FullName::new)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Body of `POST /api/v1/users/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "secret1")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Body of `PUT /api/v1/users/me`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, alias = "full_name")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = UserValidationError;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            full_name: value.full_name.as_deref().map(FullName::new).transpose()?,
            email: value.email.as_deref().map(Email::new).transpose()?,
        })
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner()).map_err(invalid_field)?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        user: (&user).into(),
    }))
}

/// Exchange email and password for a bearer token.
///
/// Unknown emails and wrong passwords produce the same 401.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(invalid_field)?;
    let user = state.accounts.authenticate(&credentials).await?;
    let issued = state.tokens.issue(user.id())?;
    info!(user_id = %user.id(), expires_at = %issued.expires_at, "token issued");
    Ok(web::Json(LoginResponse::new(issued, &user)))
}

/// Profile of the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserProfile),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<UserProfile>> {
    let user = state.account_query.profile(caller.user_id()).await?;
    Ok(web::Json((&user).into()))
}

/// Change the caller's full name and/or email.
#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser",
    security(("bearer" = []))
)]
#[put("/users/me")]
pub async fn update_current_user(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let update = ProfileUpdate::try_from(payload.into_inner()).map_err(invalid_field)?;
    let user = state
        .accounts
        .update_profile(caller.user_id(), update)
        .await?;
    Ok(web::Json((&user).into()))
}

/// Soft-delete the caller's account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteCurrentUser",
    security(("bearer" = []))
)]
#[delete("/users/me")]
pub async fn delete_current_user(
    caller: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    state.accounts.delete_account(caller.user_id()).await?;
    Ok(HttpResponse::Ok().finish())
}
