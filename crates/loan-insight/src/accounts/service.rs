use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{NewUser, PasswordDigest, PasswordHashError, User};
use super::otp::{generate_code, PendingVerification, VerificationPurpose, VerificationToken};
use super::repository::{AccountRepository, NotifierError, OtpNotifier};
use crate::config::AccountConfig;
use crate::predictions::repository::RepositoryError;

/// Handle returned after a code is dispatched; the client echoes the token back with the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingChallenge {
    pub token: VerificationToken,
    pub expires_at: DateTime<Utc>,
}

/// Two-step registration and login, each confirmed by a one-time code.
pub struct AccountService<R, N> {
    accounts: Arc<R>,
    notifier: Arc<N>,
    ttl: Duration,
}

impl<R, N> AccountService<R, N>
where
    R: AccountRepository + 'static,
    N: OtpNotifier + 'static,
{
    pub fn new(accounts: Arc<R>, notifier: Arc<N>, config: AccountConfig) -> Self {
        Self {
            accounts,
            notifier,
            ttl: Duration::minutes(i64::from(config.otp_ttl_minutes)),
        }
    }

    pub fn begin_registration(
        &self,
        email: &str,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<PendingChallenge, AccountError> {
        let email = normalize_email(email)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::Validation("username is required".to_string()));
        }
        if username
            .chars()
            .any(|c| c.is_control() || matches!(c, '"' | '\\' | '/'))
        {
            return Err(AccountError::Validation(
                "username may not contain quotes, slashes or control characters".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(AccountError::Validation("password is required".to_string()));
        }

        if self.accounts.find_by_email(&email)?.is_some() {
            return Err(AccountError::EmailTaken);
        }
        if self.accounts.find_by_username(username)?.is_some() {
            return Err(AccountError::UsernameTaken);
        }

        self.issue(
            email,
            VerificationPurpose::Registration {
                username: username.to_string(),
                password: PasswordDigest::new(password)?,
            },
            now,
        )
    }

    pub fn complete_registration(
        &self,
        token: &VerificationToken,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AccountError> {
        let pending = self.redeem(token, code, now)?;
        let VerificationPurpose::Registration { username, password } = pending.purpose else {
            return Err(AccountError::UnknownChallenge);
        };

        let user = self
            .accounts
            .create_user(NewUser {
                email: pending.email,
                username,
                password,
                created_at: now,
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => AccountError::EmailTaken,
                other => AccountError::Repository(other),
            })?;

        info!(user_id = user.id.0, "account registered");
        Ok(user)
    }

    pub fn begin_login(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<PendingChallenge, AccountError> {
        let email = normalize_email(email)?;
        let user = self
            .accounts
            .find_by_email(&email)?
            .filter(|user| user.password.verify(password))
            .ok_or(AccountError::InvalidCredentials)?;

        self.issue(email, VerificationPurpose::Login { user_id: user.id }, now)
    }

    pub fn complete_login(
        &self,
        token: &VerificationToken,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AccountError> {
        let pending = self.redeem(token, code, now)?;
        let VerificationPurpose::Login { user_id } = pending.purpose else {
            return Err(AccountError::UnknownChallenge);
        };

        let user = self.accounts.record_login(user_id, now)?;
        info!(user_id = user.id.0, "login verified");
        Ok(user)
    }

    fn issue(
        &self,
        email: String,
        purpose: VerificationPurpose,
        now: DateTime<Utc>,
    ) -> Result<PendingChallenge, AccountError> {
        let pending = PendingVerification {
            token: VerificationToken::generate(),
            email,
            purpose,
            code: generate_code(),
            expires_at: now + self.ttl,
        };
        let challenge = PendingChallenge {
            token: pending.token.clone(),
            expires_at: pending.expires_at,
        };

        self.notifier.deliver(&pending)?;
        info!(purpose = pending.purpose.kind().label(), "one-time code dispatched");
        self.accounts.store_pending(pending)?;

        Ok(challenge)
    }

    // A wrong code leaves the challenge in place; an expired one is discarded.
    fn redeem(
        &self,
        token: &VerificationToken,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<PendingVerification, AccountError> {
        let pending = self
            .accounts
            .pending(token)?
            .ok_or(AccountError::UnknownChallenge)?;

        if pending.is_expired(now) {
            self.accounts.take_pending(token)?;
            return Err(AccountError::Expired);
        }
        if pending.code != code.trim() {
            warn!(purpose = pending.purpose.kind().label(), "one-time code rejected");
            return Err(AccountError::InvalidCode);
        }

        self.accounts
            .take_pending(token)?
            .ok_or(AccountError::UnknownChallenge)
    }
}

fn normalize_email(email: &str) -> Result<String, AccountError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AccountError::Validation(
            "a valid email address is required".to_string(),
        ));
    }
    Ok(email)
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("email already registered")]
    EmailTaken,
    #[error("username already taken")]
    UsernameTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("verification challenge not found")]
    UnknownChallenge,
    #[error("invalid one-time code")]
    InvalidCode,
    #[error("one-time code has expired")]
    Expired,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notifier(#[from] NotifierError),
    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),
}

/// Writes codes to the service log; stands in for a mail or SMS gateway.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl OtpNotifier for LogNotifier {
    fn deliver(&self, pending: &PendingVerification) -> Result<(), NotifierError> {
        info!(
            email = %pending.email,
            purpose = pending.purpose.kind().label(),
            code = %pending.code,
            expires_at = %pending.expires_at,
            "one-time code issued"
        );
        Ok(())
    }
}
