use serde::Serialize;

use crate::predictions::domain::{LoanApplication, PredictionRecord};

pub const CIBIL_WEIGHT: u8 = 40;
pub const LOAN_TO_INCOME_WEIGHT: u8 = 30;
pub const ASSET_COVERAGE_WEIGHT: u8 = 20;
pub const EMPLOYMENT_WEIGHT: u8 = 10;

/// Capped additive components of the credit-health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditHealthBreakdown {
    pub cibil: u8,
    pub loan_to_income: u8,
    pub asset_coverage: u8,
    pub employment: u8,
    pub total: u8,
}

impl CreditHealthBreakdown {
    pub const EMPTY: Self = Self {
        cibil: 0,
        loan_to_income: 0,
        asset_coverage: 0,
        employment: 0,
        total: 0,
    };

    pub fn from_application(application: &LoanApplication) -> Self {
        let cibil = cibil_band(application.cibil_score);
        let loan_to_income = loan_to_income_band(application.loan_to_income_ratio());
        let asset_coverage = asset_coverage_band(application.asset_coverage_ratio());
        let employment = if application.self_employed {
            EMPLOYMENT_WEIGHT / 2
        } else {
            EMPLOYMENT_WEIGHT
        };

        let total = (cibil + loan_to_income + asset_coverage + employment).min(100);

        Self {
            cibil,
            loan_to_income,
            asset_coverage,
            employment,
            total,
        }
    }

    pub fn from_latest(latest: Option<&PredictionRecord>) -> Self {
        latest
            .map(|record| Self::from_application(&record.application))
            .unwrap_or(Self::EMPTY)
    }
}

/// Credit-health score in `0..=100` from the user's most recent prediction; zero without one.
pub fn credit_health_score(latest: Option<&PredictionRecord>) -> u8 {
    CreditHealthBreakdown::from_latest(latest).total
}

pub(crate) fn cibil_band(cibil_score: u16) -> u8 {
    match cibil_score {
        750.. => CIBIL_WEIGHT,
        700..=749 => 30,
        650..=699 => 20,
        _ => 10,
    }
}

pub(crate) fn loan_to_income_band(ratio: f64) -> u8 {
    if ratio <= 3.0 {
        LOAN_TO_INCOME_WEIGHT
    } else if ratio <= 5.0 {
        20
    } else if ratio <= 10.0 {
        10
    } else {
        0
    }
}

pub(crate) fn asset_coverage_band(ratio: f64) -> u8 {
    if ratio >= 1.5 {
        ASSET_COVERAGE_WEIGHT
    } else if ratio >= 1.0 {
        15
    } else if ratio >= 0.5 {
        10
    } else {
        0
    }
}
