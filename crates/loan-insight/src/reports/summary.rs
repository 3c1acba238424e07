use chrono::NaiveDate;
use serde::Serialize;

use crate::predictions::domain::PredictionRecord;

/// Aggregate counts and averages over a prediction history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub total: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Percent of predictions approved, `0.0` for an empty history.
    pub approval_rate: f64,
    pub average_loan_amount: f64,
    pub average_cibil: f64,
}

impl PredictionSummary {
    pub fn from_records(records: &[PredictionRecord]) -> Self {
        let total = records.len();
        if total == 0 {
            return Self {
                total: 0,
                approved: 0,
                rejected: 0,
                approval_rate: 0.0,
                average_loan_amount: 0.0,
                average_cibil: 0.0,
            };
        }

        let approved = records
            .iter()
            .filter(|record| record.verdict.is_approved())
            .count();
        let count = total as f64;
        let loan_sum: f64 = records.iter().map(|record| record.application.loan_amount).sum();
        let cibil_sum: f64 = records
            .iter()
            .map(|record| f64::from(record.application.cibil_score))
            .sum();

        Self {
            total,
            approved,
            rejected: total - approved,
            approval_rate: approved as f64 / count * 100.0,
            average_loan_amount: loan_sum / count,
            average_cibil: cibil_sum / count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsPoint {
    pub date: NaiveDate,
    pub result: &'static str,
    pub probability: f64,
    pub cibil_score: u16,
    pub loan_amount: f64,
    pub income: f64,
}

/// Chart data for the analytics page; absent until the user has predictions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsData {
    #[serde(flatten)]
    pub summary: PredictionSummary,
    pub predictions: Vec<AnalyticsPoint>,
}

impl AnalyticsData {
    pub fn from_records(records: &[PredictionRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let predictions = records
            .iter()
            .map(|record| AnalyticsPoint {
                date: record.created_at.date_naive(),
                result: record.verdict.label(),
                probability: record.probability,
                cibil_score: record.application.cibil_score,
                loan_amount: record.application.loan_amount,
                income: record.application.income_annum,
            })
            .collect();

        Some(Self {
            summary: PredictionSummary::from_records(records),
            predictions,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalPoint {
    pub date: String,
    pub approved: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanAmountPoint {
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CibilPoint {
    pub score: u16,
    pub result: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardChart {
    pub approval_trend: Vec<ApprovalPoint>,
    pub loan_amounts: Vec<LoanAmountPoint>,
    pub cibil_scores: Vec<CibilPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub summary: PredictionSummary,
    pub recent: Vec<PredictionRecord>,
    pub chart: DashboardChart,
}

impl DashboardView {
    pub const RECENT_LIMIT: usize = 5;
    pub const CHART_LIMIT: usize = 10;

    /// `history` is most recent first; the chart series run oldest first.
    pub fn from_history(history: &[PredictionRecord]) -> Self {
        let mut chart = DashboardChart::default();
        for record in history.iter().take(Self::CHART_LIMIT).rev() {
            let date = record.created_at.format("%m/%d").to_string();
            chart.approval_trend.push(ApprovalPoint {
                date: date.clone(),
                approved: u8::from(record.verdict.is_approved()),
            });
            chart.loan_amounts.push(LoanAmountPoint {
                date,
                amount: record.application.loan_amount,
            });
            chart.cibil_scores.push(CibilPoint {
                score: record.application.cibil_score,
                result: record.verdict.label(),
            });
        }

        Self {
            summary: PredictionSummary::from_records(history),
            recent: history.iter().take(Self::RECENT_LIMIT).cloned().collect(),
            chart,
        }
    }
}
