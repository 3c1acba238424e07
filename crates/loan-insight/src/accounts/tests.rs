use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::config::AccountConfig;
use crate::store::InMemoryStore;

#[derive(Default)]
struct CapturingNotifier {
    sent: Mutex<Vec<PendingVerification>>,
}

impl CapturingNotifier {
    fn last_code(&self) -> String {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .last()
            .map(|pending| pending.code.clone())
            .expect("a code was delivered")
    }

    fn delivered(&self) -> usize {
        self.sent.lock().expect("notifier mutex poisoned").len()
    }
}

impl OtpNotifier for CapturingNotifier {
    fn deliver(&self, pending: &PendingVerification) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .expect("notifier mutex poisoned")
            .push(pending.clone());
        Ok(())
    }
}

struct FailingNotifier;

impl OtpNotifier for FailingNotifier {
    fn deliver(&self, _pending: &PendingVerification) -> Result<(), NotifierError> {
        Err(NotifierError::Transport("smtp offline".to_string()))
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn service() -> (
    AccountService<InMemoryStore, CapturingNotifier>,
    Arc<CapturingNotifier>,
) {
    let notifier = Arc::new(CapturingNotifier::default());
    let service = AccountService::new(
        Arc::new(InMemoryStore::new()),
        Arc::clone(&notifier),
        AccountConfig::default(),
    );
    (service, notifier)
}

fn wrong_code(code: &str) -> String {
    if code == "000000" {
        "111111".to_string()
    } else {
        "000000".to_string()
    }
}

fn register(
    service: &AccountService<InMemoryStore, CapturingNotifier>,
    notifier: &CapturingNotifier,
) -> User {
    let challenge = service
        .begin_registration("Asha@Example.com", "asha", "s3cret", now())
        .expect("registration starts");
    service
        .complete_registration(&challenge.token, &notifier.last_code(), now())
        .expect("registration completes")
}

#[test]
fn registration_creates_verified_user() {
    let (service, notifier) = service();
    let user = register(&service, &notifier);

    assert_eq!(user.email, "asha@example.com");
    assert_eq!(user.username, "asha");
    assert!(user.is_verified);
    assert!(user.last_login.is_none());
    assert!(user.password.verify("s3cret"));
}

#[test]
fn challenge_expires_after_configured_ttl() {
    let (service, notifier) = service();
    let challenge = service
        .begin_registration("asha@example.com", "asha", "s3cret", now())
        .expect("registration starts");
    assert_eq!(challenge.expires_at, now() + Duration::minutes(10));

    let err = service
        .complete_registration(
            &challenge.token,
            &notifier.last_code(),
            now() + Duration::minutes(11),
        )
        .expect_err("expired");
    assert!(matches!(err, AccountError::Expired));

    let err = service
        .complete_registration(&challenge.token, &notifier.last_code(), now())
        .expect_err("challenge removed");
    assert!(matches!(err, AccountError::UnknownChallenge));
}

#[test]
fn wrong_code_keeps_challenge_open() {
    let (service, notifier) = service();
    let challenge = service
        .begin_registration("asha@example.com", "asha", "s3cret", now())
        .expect("registration starts");
    let code = notifier.last_code();

    let err = service
        .complete_registration(&challenge.token, &wrong_code(&code), now())
        .expect_err("wrong code");
    assert!(matches!(err, AccountError::InvalidCode));

    service
        .complete_registration(&challenge.token, &code, now())
        .expect("correct code still accepted");
    let err = service
        .complete_registration(&challenge.token, &code, now())
        .expect_err("challenge consumed");
    assert!(matches!(err, AccountError::UnknownChallenge));
}

#[test]
fn duplicate_email_and_username_are_rejected() {
    let (service, notifier) = service();
    register(&service, &notifier);

    let err = service
        .begin_registration("asha@example.com", "other", "pw", now())
        .expect_err("email taken");
    assert!(matches!(err, AccountError::EmailTaken));

    let err = service
        .begin_registration("new@example.com", "asha", "pw", now())
        .expect_err("username taken");
    assert!(matches!(err, AccountError::UsernameTaken));
}

#[test]
fn login_requires_password_then_code() {
    let (service, notifier) = service();
    let user = register(&service, &notifier);

    let err = service
        .begin_login("asha@example.com", "wrong", now())
        .expect_err("bad password");
    assert!(matches!(err, AccountError::InvalidCredentials));
    let err = service
        .begin_login("nobody@example.com", "s3cret", now())
        .expect_err("unknown email");
    assert!(matches!(err, AccountError::InvalidCredentials));

    let later = now() + Duration::minutes(3);
    let challenge = service
        .begin_login("asha@example.com", "s3cret", later)
        .expect("login starts");
    let logged_in = service
        .complete_login(&challenge.token, &notifier.last_code(), later)
        .expect("login completes");

    assert_eq!(logged_in.id, user.id);
    assert_eq!(logged_in.last_login, Some(later));
}

#[test]
fn registration_token_cannot_complete_login() {
    let (service, notifier) = service();
    let challenge = service
        .begin_registration("asha@example.com", "asha", "s3cret", now())
        .expect("registration starts");

    let err = service
        .complete_login(&challenge.token, &notifier.last_code(), now())
        .expect_err("purpose mismatch");
    assert!(matches!(err, AccountError::UnknownChallenge));
}

#[test]
fn notifier_failure_leaves_nothing_pending() {
    let service = AccountService::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(FailingNotifier),
        AccountConfig::default(),
    );
    let err = service
        .begin_registration("asha@example.com", "asha", "s3cret", now())
        .expect_err("transport down");
    assert!(matches!(err, AccountError::Notifier(_)));
}

#[test]
fn malformed_email_is_a_validation_error() {
    let (service, notifier) = service();
    let err = service
        .begin_registration("not-an-email", "asha", "s3cret", now())
        .expect_err("invalid email");
    assert!(matches!(err, AccountError::Validation(_)));
    assert_eq!(notifier.delivered(), 0);
}

#[test]
fn usernames_reject_header_breaking_characters() {
    let (service, notifier) = service();
    for username in ["as\"ha", "as\nha", "as/ha", "as\\ha", "as\u{7f}ha"] {
        let err = service
            .begin_registration("asha@example.com", username, "s3cret", now())
            .expect_err("unsafe username");
        assert!(matches!(err, AccountError::Validation(_)), "{username:?}");
    }
    assert_eq!(notifier.delivered(), 0);

    service
        .begin_registration("asha@example.com", "Asha Rao-2", "s3cret", now())
        .expect("spaces and hyphens are fine");
}

async fn post(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn router_walks_registration_and_login() {
    let notifier = Arc::new(CapturingNotifier::default());
    let service = Arc::new(AccountService::new(
        Arc::new(InMemoryStore::new()),
        Arc::clone(&notifier),
        AccountConfig::default(),
    ));
    let router = account_router(service);

    let (status, challenge) = post(
        router.clone(),
        "/api/v1/accounts/register",
        json!({ "email": "asha@example.com", "username": "asha", "password": "s3cret" }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let token = challenge["token"].as_str().expect("token").to_string();

    let (status, body) = post(
        router.clone(),
        "/api/v1/accounts/register/verify",
        json!({ "token": token, "code": wrong_code(&notifier.last_code()) }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, user) = post(
        router.clone(),
        "/api/v1/accounts/register/verify",
        json!({ "token": token, "code": notifier.last_code() }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "asha");
    assert!(user.get("password").is_none());

    let (status, _) = post(
        router.clone(),
        "/api/v1/accounts/register",
        json!({ "email": "asha@example.com", "username": "asha2", "password": "x" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, challenge) = post(
        router.clone(),
        "/api/v1/accounts/login",
        json!({ "email": "asha@example.com", "password": "s3cret" }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, user) = post(
        router,
        "/api/v1/accounts/login/verify",
        json!({ "token": challenge["token"], "code": notifier.last_code() }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(user["last_login"].is_string());
}
