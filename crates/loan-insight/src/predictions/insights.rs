use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{CreditScoreEntry, LoanApplication, ScoreSource, UserId};
use super::repository::{CreditHistoryRepository, PredictionRepository, RepositoryError};
use crate::config::InsightConfig;
use crate::gamification::{
    BadgeDescriptor, BadgeRepository, BadgeSummary, GamificationEngine, GamificationError,
    UserAction,
};
use crate::reports::{AnalyticsData, DashboardView};
use crate::scoring::{
    check_eligibility, trend_history, EligibilityReport, EligibilityRequest, ProfileInsights,
    TrendPoint,
};

/// Eligibility verdict plus any badge the check unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityCheck {
    #[serde(flatten)]
    pub report: EligibilityReport,
    pub new_badge: Option<BadgeDescriptor>,
}

/// Read-side views over a user's history, plus the calculator and manual score entries.
pub struct InsightService<P, C, B> {
    predictions: Arc<P>,
    credit_history: Arc<C>,
    gamification: GamificationEngine<B>,
    config: InsightConfig,
}

impl<P, C, B> InsightService<P, C, B>
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    pub fn new(
        predictions: Arc<P>,
        credit_history: Arc<C>,
        gamification: GamificationEngine<B>,
        config: InsightConfig,
    ) -> Self {
        Self {
            predictions,
            credit_history,
            gamification,
            config,
        }
    }

    pub fn insights(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<ProfileInsights, InsightError> {
        let history = self.predictions.history(user_id)?;
        let entries = self.credit_history.entries(user_id)?;
        Ok(ProfileInsights::from_history(
            &history,
            &entries,
            now,
            self.config.trend_window_days,
        ))
    }

    /// Trend over `days`, or the configured window when absent.
    pub fn trend(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        days: Option<u32>,
    ) -> Result<Vec<TrendPoint>, InsightError> {
        let window = days.unwrap_or(self.config.trend_window_days);
        if window == 0 {
            return Err(InsightError::Validation(
                "trend window must be at least one day".to_string(),
            ));
        }
        let history = self.predictions.history(user_id)?;
        let entries = self.credit_history.entries(user_id)?;
        Ok(trend_history(&entries, &history, now, window))
    }

    pub fn record_credit_score(
        &self,
        user_id: UserId,
        cibil_score: u16,
        source: ScoreSource,
        now: DateTime<Utc>,
    ) -> Result<CreditScoreEntry, InsightError> {
        if !(LoanApplication::MIN_CIBIL..=LoanApplication::MAX_CIBIL).contains(&cibil_score) {
            return Err(InsightError::Validation(format!(
                "CIBIL score {cibil_score} must be between {} and {}",
                LoanApplication::MIN_CIBIL,
                LoanApplication::MAX_CIBIL
            )));
        }

        let entry = CreditScoreEntry {
            user_id,
            cibil_score,
            recorded_at: now,
            source,
        };
        self.credit_history.record(entry.clone())?;
        info!(
            user_id = user_id.0,
            cibil_score,
            source = source.label(),
            "credit score recorded"
        );
        Ok(entry)
    }

    pub fn analytics(&self, user_id: UserId) -> Result<Option<AnalyticsData>, InsightError> {
        let history = self.predictions.history(user_id)?;
        Ok(AnalyticsData::from_records(&history))
    }

    pub fn dashboard(&self, user_id: UserId) -> Result<DashboardView, InsightError> {
        let history = self.predictions.history(user_id)?;
        Ok(DashboardView::from_history(&history))
    }

    pub fn check_eligibility(
        &self,
        user_id: UserId,
        request: &EligibilityRequest,
        now: DateTime<Utc>,
    ) -> Result<EligibilityCheck, InsightError> {
        if !request.income.is_finite() || !request.loan_amount.is_finite() {
            return Err(InsightError::Validation(
                "income and loan amount must be finite".to_string(),
            ));
        }
        let report = check_eligibility(request);
        let new_badge = self
            .gamification
            .record_action(user_id, UserAction::UsedCalculator, now)?;
        Ok(EligibilityCheck { report, new_badge })
    }

    pub fn badges(&self, user_id: UserId) -> Result<BadgeSummary, InsightError> {
        Ok(self.gamification.summary(user_id)?)
    }

    pub fn record_action(
        &self,
        user_id: UserId,
        action: UserAction,
        now: DateTime<Utc>,
    ) -> Result<Option<BadgeDescriptor>, InsightError> {
        Ok(self.gamification.record_action(user_id, action, now)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Gamification(#[from] GamificationError),
}
