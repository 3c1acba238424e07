use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::otp::VerificationToken;
use super::repository::{AccountRepository, OtpNotifier};
use super::service::{AccountError, AccountService};

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyRequest {
    pub(crate) token: VerificationToken,
    pub(crate) code: String,
}

/// Registration and login endpoints, each a begin/verify pair.
pub fn account_router<R, N>(service: Arc<AccountService<R, N>>) -> Router
where
    R: AccountRepository + 'static,
    N: OtpNotifier + 'static,
{
    Router::new()
        .route("/api/v1/accounts/register", post(register_handler::<R, N>))
        .route(
            "/api/v1/accounts/register/verify",
            post(verify_registration_handler::<R, N>),
        )
        .route("/api/v1/accounts/login", post(login_handler::<R, N>))
        .route(
            "/api/v1/accounts/login/verify",
            post(verify_login_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<R, N>(
    State(service): State<Arc<AccountService<R, N>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    N: OtpNotifier + 'static,
{
    match service.begin_registration(
        &request.email,
        &request.username,
        &request.password,
        Utc::now(),
    ) {
        Ok(challenge) => (StatusCode::ACCEPTED, axum::Json(challenge)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verify_registration_handler<R, N>(
    State(service): State<Arc<AccountService<R, N>>>,
    axum::Json(request): axum::Json<VerifyRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    N: OtpNotifier + 'static,
{
    match service.complete_registration(&request.token, &request.code, Utc::now()) {
        Ok(user) => (StatusCode::CREATED, axum::Json(user.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn login_handler<R, N>(
    State(service): State<Arc<AccountService<R, N>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    N: OtpNotifier + 'static,
{
    match service.begin_login(&request.email, &request.password, Utc::now()) {
        Ok(challenge) => (StatusCode::ACCEPTED, axum::Json(challenge)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verify_login_handler<R, N>(
    State(service): State<Arc<AccountService<R, N>>>,
    axum::Json(request): axum::Json<VerifyRequest>,
) -> Response
where
    R: AccountRepository + 'static,
    N: OtpNotifier + 'static,
{
    match service.complete_login(&request.token, &request.code, Utc::now()) {
        Ok(user) => (StatusCode::OK, axum::Json(user.view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AccountError) -> Response {
    let status = match &error {
        AccountError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AccountError::EmailTaken | AccountError::UsernameTaken => StatusCode::CONFLICT,
        AccountError::InvalidCredentials | AccountError::InvalidCode => StatusCode::UNAUTHORIZED,
        AccountError::UnknownChallenge => StatusCode::NOT_FOUND,
        AccountError::Expired => StatusCode::GONE,
        AccountError::Repository(_)
        | AccountError::Notifier(_)
        | AccountError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
