use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a registered user; predictions, badges, and credit history hang off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier assigned by the prediction store when a record is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Education {
    Graduate,
    #[serde(rename = "Not Graduate", alias = "NotGraduate")]
    NotGraduate,
}

impl Education {
    pub const fn label(self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::NotGraduate => "Not Graduate",
        }
    }
}

/// Applicant-declared snapshot submitted for a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub no_of_dependents: u32,
    pub education: Education,
    pub self_employed: bool,
    pub income_annum: f64,
    pub loan_amount: f64,
    /// Requested term in months.
    pub loan_term: u32,
    pub cibil_score: u16,
    pub residential_assets_value: f64,
    pub commercial_assets_value: f64,
    pub luxury_assets_value: f64,
    pub bank_asset_value: f64,
}

impl LoanApplication {
    pub const MIN_CIBIL: u16 = 300;
    pub const MAX_CIBIL: u16 = 900;

    pub fn total_assets(&self) -> f64 {
        self.residential_assets_value
            + self.commercial_assets_value
            + self.luxury_assets_value
            + self.bank_asset_value
    }

    pub fn monthly_income(&self) -> f64 {
        self.income_annum / 12.0
    }

    /// Requested amount over monthly income. Zero income yields `+inf` unless nothing is requested.
    pub fn loan_to_income_ratio(&self) -> f64 {
        let monthly_income = self.monthly_income();
        if monthly_income > 0.0 {
            self.loan_amount / monthly_income
        } else if self.loan_amount > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    /// Declared assets over the requested amount; zero when nothing is requested.
    pub fn asset_coverage_ratio(&self) -> f64 {
        if self.loan_amount > 0.0 {
            self.total_assets() / self.loan_amount
        } else {
            0.0
        }
    }

    pub fn employment_label(&self) -> &'static str {
        if self.self_employed {
            "Yes"
        } else {
            "No"
        }
    }

    pub fn validate(&self) -> Result<(), ApplicationValidationError> {
        if !(Self::MIN_CIBIL..=Self::MAX_CIBIL).contains(&self.cibil_score) {
            return Err(ApplicationValidationError::CibilOutOfRange(self.cibil_score));
        }

        let amounts = [
            ("income_annum", self.income_annum),
            ("loan_amount", self.loan_amount),
            ("residential_assets_value", self.residential_assets_value),
            ("commercial_assets_value", self.commercial_assets_value),
            ("luxury_assets_value", self.luxury_assets_value),
            ("bank_asset_value", self.bank_asset_value),
        ];
        for (field, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ApplicationValidationError::InvalidAmount { field });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationValidationError {
    #[error("CIBIL score {0} must be between 300 and 900")]
    CibilOutOfRange(u16),
    #[error("{field} must be a finite, non-negative amount")]
    InvalidAmount { field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Approved => "Approved",
            Verdict::Rejected => "Rejected",
        }
    }

    pub const fn is_approved(self) -> bool {
        matches!(self, Verdict::Approved)
    }
}

/// Stored verdict for one submitted application. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: PredictionId,
    pub user_id: UserId,
    pub application: LoanApplication,
    pub verdict: Verdict,
    /// Approval confidence as a percentage with two decimals.
    pub probability: f64,
    pub created_at: DateTime<Utc>,
}

/// Everything the store needs to append a record; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrediction {
    pub user_id: UserId,
    pub application: LoanApplication,
    pub verdict: Verdict,
    pub probability: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Manual,
    Prediction,
    Api,
}

impl ScoreSource {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreSource::Manual => "manual",
            ScoreSource::Prediction => "prediction",
            ScoreSource::Api => "api",
        }
    }
}

/// Explicitly recorded CIBIL reading outside of a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditScoreEntry {
    pub user_id: UserId,
    pub cibil_score: u16,
    pub recorded_at: DateTime<Utc>,
    pub source: ScoreSource,
}
