use chrono::{DateTime, Utc};
use serde::Serialize;

use super::health::CreditHealthBreakdown;
use super::issues::{analyze_credit_issues, CreditIssue};
use super::plan::{generate_improvement_plan, ImprovementAction};
use super::readiness::{loan_readiness, LoanReadiness};
use super::trend::{trend_history, TrendPoint};
use crate::predictions::domain::{CreditScoreEntry, PredictionRecord};

/// Every derived view for one user, computed from history on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInsights {
    pub credit_health_score: u8,
    pub credit_health: CreditHealthBreakdown,
    pub loan_readiness: LoanReadiness,
    pub issues: Vec<CreditIssue>,
    pub improvement_plan: Vec<ImprovementAction>,
    pub trend: Vec<TrendPoint>,
}

impl ProfileInsights {
    /// `history` is most recent first, as the prediction store returns it.
    pub fn from_history(
        history: &[PredictionRecord],
        entries: &[CreditScoreEntry],
        now: DateTime<Utc>,
        window_days: u32,
    ) -> Self {
        let latest = history.first();
        let credit_health = CreditHealthBreakdown::from_latest(latest);

        Self {
            credit_health_score: credit_health.total,
            credit_health,
            loan_readiness: loan_readiness(latest),
            issues: analyze_credit_issues(latest),
            improvement_plan: generate_improvement_plan(latest),
            trend: trend_history(entries, history, now, window_days),
        }
    }
}
