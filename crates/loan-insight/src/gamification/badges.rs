use serde::{Deserialize, Serialize};

use crate::predictions::domain::PredictionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    FirstPrediction,
    FivePredictions,
    TenPredictions,
    ApprovedOnce,
    ThreeApprovals,
    HighScore,
    CalculatorUsed,
    StatementUploaded,
    ReportExported,
}

/// Catalog entry shown to users when a badge is awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeDescriptor {
    pub kind: BadgeKind,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub points: u32,
}

/// Discrete user actions that unlock a badge on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    UsedCalculator,
    UploadedStatement,
    ExportedReport,
}

impl UserAction {
    pub const fn badge(self) -> BadgeKind {
        match self {
            UserAction::UsedCalculator => BadgeKind::CalculatorUsed,
            UserAction::UploadedStatement => BadgeKind::StatementUploaded,
            UserAction::ExportedReport => BadgeKind::ReportExported,
        }
    }
}

pub const HIGH_SCORE_CIBIL: u16 = 750;

/// History-driven badges in the order a check pass evaluates them.
pub const HISTORY_BADGES: [BadgeKind; 6] = [
    BadgeKind::FirstPrediction,
    BadgeKind::FivePredictions,
    BadgeKind::TenPredictions,
    BadgeKind::ApprovedOnce,
    BadgeKind::ThreeApprovals,
    BadgeKind::HighScore,
];

impl BadgeKind {
    pub const ALL: [BadgeKind; 9] = [
        BadgeKind::FirstPrediction,
        BadgeKind::FivePredictions,
        BadgeKind::TenPredictions,
        BadgeKind::ApprovedOnce,
        BadgeKind::ThreeApprovals,
        BadgeKind::HighScore,
        BadgeKind::CalculatorUsed,
        BadgeKind::StatementUploaded,
        BadgeKind::ReportExported,
    ];

    pub const fn descriptor(self) -> BadgeDescriptor {
        let (key, name, description, points) = match self {
            BadgeKind::FirstPrediction => (
                "first_prediction",
                "First Steps",
                "Made your first loan prediction",
                10,
            ),
            BadgeKind::FivePredictions => (
                "five_predictions",
                "Getting Serious",
                "Made five loan predictions",
                25,
            ),
            BadgeKind::TenPredictions => (
                "ten_predictions",
                "Power User",
                "Made ten loan predictions",
                50,
            ),
            BadgeKind::ApprovedOnce => (
                "approved_once",
                "First Approval",
                "Received your first approval",
                20,
            ),
            BadgeKind::ThreeApprovals => (
                "three_approvals",
                "Triple Approval",
                "Received three approvals",
                40,
            ),
            BadgeKind::HighScore => (
                "high_score",
                "Credit Champion",
                "Submitted an application with a CIBIL score of 750 or more",
                30,
            ),
            BadgeKind::CalculatorUsed => (
                "calculator_used",
                "Number Cruncher",
                "Checked eligibility with the calculator",
                5,
            ),
            BadgeKind::StatementUploaded => (
                "statement_uploaded",
                "Paper Trail",
                "Uploaded a bank statement",
                15,
            ),
            BadgeKind::ReportExported => (
                "report_exported",
                "Record Keeper",
                "Exported a prediction report",
                10,
            ),
        };

        BadgeDescriptor {
            kind: self,
            key,
            name,
            description,
            points,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.descriptor().key == key)
    }

    /// Whether the history alone satisfies this badge. Action badges never do.
    pub fn is_earned_by(self, history: &[PredictionRecord]) -> bool {
        let approvals = || {
            history
                .iter()
                .filter(|record| record.verdict.is_approved())
                .count()
        };

        match self {
            BadgeKind::FirstPrediction => !history.is_empty(),
            BadgeKind::FivePredictions => history.len() >= 5,
            BadgeKind::TenPredictions => history.len() >= 10,
            BadgeKind::ApprovedOnce => approvals() >= 1,
            BadgeKind::ThreeApprovals => approvals() >= 3,
            BadgeKind::HighScore => history
                .iter()
                .any(|record| record.application.cibil_score >= HIGH_SCORE_CIBIL),
            BadgeKind::CalculatorUsed
            | BadgeKind::StatementUploaded
            | BadgeKind::ReportExported => false,
        }
    }
}
