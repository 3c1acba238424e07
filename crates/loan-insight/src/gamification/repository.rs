use chrono::{DateTime, Utc};
use serde::Serialize;

use super::badges::BadgeKind;
use crate::predictions::domain::UserId;
use crate::predictions::repository::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EarnedBadge {
    pub kind: BadgeKind,
    pub awarded_at: DateTime<Utc>,
}

/// Outcome of an atomic grant attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeGrant {
    Granted,
    AlreadyHeld,
}

/// Per-user badge set and points counter.
pub trait BadgeRepository: Send + Sync {
    /// Stores the badge and adds `points` in one atomic step, or reports it as already held.
    /// Concurrent grants of the same badge must produce exactly one `Granted`.
    fn grant(
        &self,
        user_id: UserId,
        badge: BadgeKind,
        points: u32,
        awarded_at: DateTime<Utc>,
    ) -> Result<BadgeGrant, RepositoryError>;
    /// Earned badges in award order.
    fn earned(&self, user_id: UserId) -> Result<Vec<EarnedBadge>, RepositoryError>;
    fn points(&self, user_id: UserId) -> Result<u32, RepositoryError>;
}
