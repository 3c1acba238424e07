//! Heuristic attribution of a verdict to the application's input factors.
//!
//! Each factor gets a raw 0..=100 strength; strengths are then rescaled to shares of 100.

use serde::Serialize;

use crate::predictions::domain::{Education, LoanApplication};

const CIBIL_CEILING: f64 = 900.0;
const INCOME_CEILING: f64 = 2_000_000.0;
const ASSET_CEILING: f64 = 5_000_000.0;
const LOAN_CEILING: f64 = 5_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub name: &'static str,
    pub percent: f64,
}

pub fn feature_importance(application: &LoanApplication) -> Vec<FeatureContribution> {
    let capped = |value: f64, ceiling: f64| (value / ceiling * 100.0).min(100.0);

    let raw = vec![
        FeatureContribution {
            name: "CIBIL Score",
            percent: capped(f64::from(application.cibil_score), CIBIL_CEILING),
        },
        FeatureContribution {
            name: "Income Level",
            percent: capped(application.income_annum, INCOME_CEILING),
        },
        FeatureContribution {
            name: "Total Assets",
            percent: capped(application.total_assets(), ASSET_CEILING),
        },
        // Larger requests lower this factor.
        FeatureContribution {
            name: "Loan Amount",
            percent: 100.0 - capped(application.loan_amount, LOAN_CEILING),
        },
        FeatureContribution {
            name: "Employment",
            percent: if application.self_employed { 60.0 } else { 80.0 },
        },
        FeatureContribution {
            name: "Education",
            percent: match application.education {
                Education::Graduate => 85.0,
                Education::NotGraduate => 65.0,
            },
        },
    ];

    normalize_contributions(raw)
}

/// Rescales to a total of 100 and orders by share, largest first. A zero total is left as-is.
pub fn normalize_contributions(mut contributions: Vec<FeatureContribution>) -> Vec<FeatureContribution> {
    let total: f64 = contributions.iter().map(|item| item.percent).sum();
    if total > 0.0 {
        for item in &mut contributions {
            item.percent = item.percent / total * 100.0;
        }
    }

    contributions.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    contributions
}
