use chrono::{DateTime, Utc};

use super::domain::{NewUser, User};
use super::otp::{PendingVerification, VerificationToken};
use crate::predictions::domain::UserId;
use crate::predictions::repository::RepositoryError;

pub trait AccountRepository: Send + Sync {
    /// Fails with `Conflict` when the email or username is already registered.
    fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<User, RepositoryError>;

    /// Stores the challenge, dropping any earlier one for the same email and purpose.
    fn store_pending(&self, pending: PendingVerification) -> Result<(), RepositoryError>;
    fn pending(&self, token: &VerificationToken)
        -> Result<Option<PendingVerification>, RepositoryError>;
    /// Removes and returns the challenge; only one caller can consume it.
    fn take_pending(
        &self,
        token: &VerificationToken,
    ) -> Result<Option<PendingVerification>, RepositoryError>;
}

/// Out-of-band delivery of one-time codes (e-mail, SMS, console).
pub trait OtpNotifier: Send + Sync {
    fn deliver(&self, pending: &PendingVerification) -> Result<(), NotifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("otp transport unavailable: {0}")]
    Transport(String),
}
