use chrono::{DateTime, Utc};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::domain::{to_hex, PasswordDigest};
use crate::predictions::domain::UserId;

/// Opaque handle the client presents with the code; replaces server-side session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationToken(pub String);

impl VerificationToken {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(to_hex(&bytes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurposeKind {
    Registration,
    Login,
}

impl PurposeKind {
    pub const fn label(self) -> &'static str {
        match self {
            PurposeKind::Registration => "registration",
            PurposeKind::Login => "login",
        }
    }
}

/// What completing the challenge will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationPurpose {
    Registration {
        username: String,
        password: PasswordDigest,
    },
    Login {
        user_id: UserId,
    },
}

impl VerificationPurpose {
    pub const fn kind(&self) -> PurposeKind {
        match self {
            VerificationPurpose::Registration { .. } => PurposeKind::Registration,
            VerificationPurpose::Login { .. } => PurposeKind::Login,
        }
    }
}

/// Short-lived challenge awaiting its one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    pub token: VerificationToken,
    pub email: String,
    pub purpose: VerificationPurpose,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl PendingVerification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Six decimal digits, zero padded.
pub fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{value:06}")
}
