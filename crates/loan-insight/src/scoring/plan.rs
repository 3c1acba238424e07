use serde::Serialize;

use crate::predictions::domain::PredictionRecord;

/// Annual rate used for the rough EMI estimate.
pub const ESTIMATED_ANNUAL_RATE: f64 = 0.09;
/// Largest share of monthly income an EMI should take.
pub const MAX_EMI_SHARE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovementAction {
    pub priority: ActionPriority,
    pub action: &'static str,
    pub description: &'static str,
    pub timeline: &'static str,
    pub impact: String,
}

pub fn generate_improvement_plan(latest: Option<&PredictionRecord>) -> Vec<ImprovementAction> {
    let Some(record) = latest else {
        return vec![ImprovementAction {
            priority: ActionPriority::Critical,
            action: "Complete Your First Loan Prediction",
            description: "Use our prediction tool to assess your loan eligibility.",
            timeline: "1 day",
            impact: "Get personalized insights".to_string(),
        }];
    };
    let application = &record.application;
    let mut plan = Vec::new();

    let cibil = application.cibil_score;
    if cibil < 700 {
        plan.push(ImprovementAction {
            priority: ActionPriority::Critical,
            action: "Improve Your CIBIL Score",
            description: "Pay all dues on time, reduce credit utilization below 30%, avoid multiple loan applications.",
            timeline: "3-6 months",
            impact: format!("+{} points potential", 750 - cibil),
        });
    }

    if emi_exceeds_income_share(application.loan_amount, application.monthly_income()) {
        plan.push(ImprovementAction {
            priority: ActionPriority::High,
            action: "Reduce Loan Amount or Increase Income",
            description: "EMI should not exceed 40% of monthly income. Consider reducing loan amount or exploring income sources.",
            timeline: "1-3 months",
            impact: "Improve approval chances by 40%".to_string(),
        });
    }

    if application.total_assets() < application.loan_amount * 0.5 {
        plan.push(ImprovementAction {
            priority: ActionPriority::Medium,
            action: "Build Your Asset Base",
            description: "Increase savings, document existing assets properly, consider fixed deposits.",
            timeline: "6-12 months",
            impact: "Strengthen application security".to_string(),
        });
    }

    plan.push(ImprovementAction {
        priority: ActionPriority::Low,
        action: "Gather Required Documents",
        description: "Keep PAN, Aadhaar, salary slips, bank statements, property papers ready.",
        timeline: "1 week",
        impact: "Faster processing".to_string(),
    });

    plan
}

pub fn estimated_emi(loan_amount: f64) -> f64 {
    loan_amount * ESTIMATED_ANNUAL_RATE / 12.0
}

// Zero income with any EMI counts as over the limit.
fn emi_exceeds_income_share(loan_amount: f64, monthly_income: f64) -> bool {
    let emi = estimated_emi(loan_amount);
    if monthly_income > 0.0 {
        emi / monthly_income > MAX_EMI_SHARE
    } else {
        emi > 0.0
    }
}
