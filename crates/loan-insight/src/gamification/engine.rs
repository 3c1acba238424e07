use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::badges::{BadgeDescriptor, BadgeKind, UserAction, HISTORY_BADGES};
use super::repository::{BadgeGrant, BadgeRepository, EarnedBadge};
use crate::predictions::domain::{PredictionRecord, UserId};
use crate::predictions::repository::RepositoryError;

/// Evaluates badge rules and records awards through the repository.
pub struct GamificationEngine<B> {
    badges: Arc<B>,
}

impl<B> Clone for GamificationEngine<B> {
    fn clone(&self) -> Self {
        Self {
            badges: Arc::clone(&self.badges),
        }
    }
}

impl<B> GamificationEngine<B>
where
    B: BadgeRepository + 'static,
{
    pub fn new(badges: Arc<B>) -> Self {
        Self { badges }
    }

    /// Awards one badge. Returns `None` when the user already holds it, including when a
    /// concurrent request won the race.
    pub fn award_badge(
        &self,
        user_id: UserId,
        badge: BadgeKind,
        now: DateTime<Utc>,
    ) -> Result<Option<BadgeDescriptor>, GamificationError> {
        let descriptor = badge.descriptor();
        match self
            .badges
            .grant(user_id, badge, descriptor.points, now)?
        {
            BadgeGrant::Granted => {
                info!(
                    user_id = user_id.0,
                    badge = descriptor.key,
                    points = descriptor.points,
                    "badge awarded"
                );
                Ok(Some(descriptor))
            }
            BadgeGrant::AlreadyHeld => Ok(None),
        }
    }

    /// Single pass over the history-driven badges in catalog order; returns only new awards.
    pub fn check_and_award_badges(
        &self,
        user_id: UserId,
        history: &[PredictionRecord],
        now: DateTime<Utc>,
    ) -> Result<Vec<BadgeDescriptor>, GamificationError> {
        let mut awarded = Vec::new();
        for badge in HISTORY_BADGES {
            if !badge.is_earned_by(history) {
                continue;
            }
            if let Some(descriptor) = self.award_badge(user_id, badge, now)? {
                awarded.push(descriptor);
            }
        }
        Ok(awarded)
    }

    pub fn record_action(
        &self,
        user_id: UserId,
        action: UserAction,
        now: DateTime<Utc>,
    ) -> Result<Option<BadgeDescriptor>, GamificationError> {
        self.award_badge(user_id, action.badge(), now)
    }

    pub fn summary(&self, user_id: UserId) -> Result<BadgeSummary, GamificationError> {
        let points = self.badges.points(user_id)?;
        let badges = self
            .badges
            .earned(user_id)?
            .into_iter()
            .map(|earned: EarnedBadge| EarnedBadgeView {
                badge: earned.kind.descriptor(),
                awarded_at: earned.awarded_at,
            })
            .collect();

        Ok(BadgeSummary {
            user_id,
            points,
            badges,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarnedBadgeView {
    pub badge: BadgeDescriptor,
    pub awarded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeSummary {
    pub user_id: UserId,
    pub points: u32,
    pub badges: Vec<EarnedBadgeView>,
}

#[derive(Debug, thiserror::Error)]
pub enum GamificationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
