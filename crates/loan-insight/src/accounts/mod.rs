//! User accounts with one-time-code verification for registration and login.

pub mod domain;
pub mod otp;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{NewUser, PasswordDigest, PasswordHashError, User, UserView};
pub use otp::{PendingVerification, PurposeKind, VerificationPurpose, VerificationToken};
pub use repository::{AccountRepository, NotifierError, OtpNotifier};
pub use router::account_router;
pub use service::{AccountError, AccountService, LogNotifier, PendingChallenge};

#[cfg(test)]
mod tests;
