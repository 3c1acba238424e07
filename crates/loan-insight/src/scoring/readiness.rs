use serde::Serialize;

use super::money::format_rupees;
use crate::predictions::domain::PredictionRecord;

pub const MIN_MONTHLY_INCOME: f64 = 50_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
    NotReady,
}

impl ReadinessLevel {
    /// Threshold mapping shared with the credit-health bands: 80, 60, 40.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsImprovement => "Needs Improvement",
            Self::NotReady => "Not Ready",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#2ecc71",
            Self::Good => "#3498db",
            Self::Fair => "#f39c12",
            Self::NeedsImprovement | Self::NotReady => "#e74c3c",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessFactor {
    pub name: String,
    pub status: bool,
}

impl ReadinessFactor {
    fn new(name: impl Into<String>, status: bool) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanReadiness {
    pub score: u8,
    pub level: ReadinessLevel,
    pub level_label: &'static str,
    pub color: &'static str,
    pub factors: Vec<ReadinessFactor>,
}

impl LoanReadiness {
    fn with_level(score: u8, level: ReadinessLevel, factors: Vec<ReadinessFactor>) -> Self {
        Self {
            score,
            level,
            level_label: level.label(),
            color: level.color(),
            factors,
        }
    }

    fn not_ready() -> Self {
        Self::with_level(
            0,
            ReadinessLevel::NotReady,
            vec![ReadinessFactor::new("No data available", false)],
        )
    }
}

pub fn loan_readiness(latest: Option<&PredictionRecord>) -> LoanReadiness {
    let Some(record) = latest else {
        return LoanReadiness::not_ready();
    };
    let application = &record.application;

    let mut score = 0u8;
    let mut factors = Vec::with_capacity(4);

    let cibil = application.cibil_score;
    if cibil >= 750 {
        score += 30;
        factors.push(ReadinessFactor::new("Excellent CIBIL Score (750+)", true));
    } else if cibil >= 700 {
        score += 20;
        factors.push(ReadinessFactor::new("Good CIBIL Score (700+)", true));
    } else {
        factors.push(ReadinessFactor::new(
            format!("CIBIL Score {cibil} (Need 700+)"),
            false,
        ));
    }

    let monthly_income = application.monthly_income();
    if monthly_income >= MIN_MONTHLY_INCOME {
        score += 25;
        factors.push(ReadinessFactor::new(
            format!("Stable Income {}/month", format_rupees(monthly_income)),
            true,
        ));
    } else {
        factors.push(ReadinessFactor::new(
            format!(
                "Income {} (Recommended: {}+)",
                format_rupees(monthly_income),
                format_rupees(MIN_MONTHLY_INCOME)
            ),
            false,
        ));
    }

    if application.loan_to_income_ratio() <= 5.0 {
        score += 25;
        factors.push(ReadinessFactor::new("Manageable Loan Amount", true));
    } else {
        factors.push(ReadinessFactor::new("Loan Amount Too High vs Income", false));
    }

    if application.total_assets() >= application.loan_amount * 0.5 {
        score += 20;
        factors.push(ReadinessFactor::new("Sufficient Asset Coverage", true));
    } else {
        factors.push(ReadinessFactor::new("Need More Asset Documentation", false));
    }

    LoanReadiness::with_level(score, ReadinessLevel::from_score(score), factors)
}
