//! Rule-based financial scoring over a user's prediction history.
//!
//! Every function here is pure: it reads a record (usually the latest) and returns a typed
//! result. Missing history degrades to a documented empty or zero result instead of failing.

pub mod attribution;
pub mod eligibility;
pub mod health;
mod insights;
pub mod issues;
pub mod money;
pub mod plan;
pub mod readiness;
pub mod recommendations;
pub mod trend;

pub use attribution::{feature_importance, normalize_contributions, FeatureContribution};
pub use eligibility::{check_eligibility, EligibilityReport, EligibilityRequest};
pub use health::{credit_health_score, CreditHealthBreakdown};
pub use insights::ProfileInsights;
pub use issues::{analyze_credit_issues, CreditIssue, IssueImpact, IssueSeverity};
pub use money::format_rupees;
pub use plan::{generate_improvement_plan, ActionPriority, ImprovementAction};
pub use readiness::{loan_readiness, LoanReadiness, ReadinessFactor, ReadinessLevel};
pub use recommendations::{
    generate_recommendations, RecommendationBlock, RecommendationPriority, Recommendations,
    GENERAL_TIPS,
};
pub use trend::{trend_history, TrendPoint};

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::predictions::domain::{
        Education, LoanApplication, PredictionId, PredictionRecord, UserId, Verdict,
    };

    /// Salaried graduate, 100,000 monthly income, 900,000 requested, 1,000,000 in assets.
    pub(crate) fn application() -> LoanApplication {
        LoanApplication {
            no_of_dependents: 2,
            education: Education::Graduate,
            self_employed: false,
            income_annum: 1_200_000.0,
            loan_amount: 900_000.0,
            loan_term: 120,
            cibil_score: 720,
            residential_assets_value: 600_000.0,
            commercial_assets_value: 200_000.0,
            luxury_assets_value: 100_000.0,
            bank_asset_value: 100_000.0,
        }
    }

    pub(crate) fn record(application: LoanApplication) -> PredictionRecord {
        let created_at = Utc
            .with_ymd_and_hms(2025, 6, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        record_at(application, created_at)
    }

    pub(crate) fn record_at(
        application: LoanApplication,
        created_at: DateTime<Utc>,
    ) -> PredictionRecord {
        PredictionRecord {
            id: PredictionId(1),
            user_id: UserId(1),
            application,
            verdict: Verdict::Approved,
            probability: 82.5,
            created_at,
        }
    }

    #[test]
    fn insights_degrade_without_history() {
        let now = Utc
            .with_ymd_and_hms(2025, 6, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp");

        let insights = super::ProfileInsights::from_history(&[], &[], now, 180);

        assert_eq!(insights.credit_health_score, 0);
        assert_eq!(insights.loan_readiness.level_label, "Not Ready");
        assert_eq!(insights.issues.len(), 1);
        assert_eq!(insights.issues[0].issue, "No Credit History");
        assert!(insights.trend.is_empty());
    }

    #[test]
    fn insights_follow_most_recent_record() {
        let older = record_at(
            LoanApplication {
                cibil_score: 600,
                ..application()
            },
            Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0)
                .single()
                .expect("valid timestamp"),
        );
        let newest = record(LoanApplication {
            cibil_score: 790,
            ..application()
        });
        let now = newest.created_at;

        let insights = super::ProfileInsights::from_history(&[newest, older], &[], now, 180);

        assert_eq!(insights.credit_health.cibil, 40);
        assert_eq!(insights.trend.len(), 2);
        assert_eq!(insights.trend[0].score, 600);
    }
}
