use serde::Serialize;

use super::money::format_rupees;
use crate::predictions::domain::{LoanApplication, Verdict};

pub const TARGET_CIBIL: u16 = 750;

pub const GENERAL_TIPS: [&str; 5] = [
    "Pay all credit card bills in full each month",
    "Don't apply for multiple loans simultaneously",
    "Keep old credit accounts active (longer credit history helps)",
    "Check your credit report annually for errors",
    "Maintain a healthy debt-to-income ratio (below 40%)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Medium,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationBlock {
    pub title: &'static str,
    pub icon: &'static str,
    pub priority: RecommendationPriority,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub blocks: Vec<RecommendationBlock>,
    pub general_tips: Vec<&'static str>,
}

pub fn generate_recommendations(application: &LoanApplication, verdict: Verdict) -> Recommendations {
    let blocks = match verdict {
        Verdict::Rejected => rejection_blocks(application),
        Verdict::Approved => vec![approval_block(application)],
    };

    Recommendations {
        blocks,
        general_tips: GENERAL_TIPS.to_vec(),
    }
}

fn rejection_blocks(application: &LoanApplication) -> Vec<RecommendationBlock> {
    let cibil = application.cibil_score;
    let loan_amount = application.loan_amount;
    let income = application.income_annum;
    let total_assets = application.total_assets();
    let mut blocks = Vec::new();

    if cibil < TARGET_CIBIL {
        blocks.push(RecommendationBlock {
            title: "Credit Score Improvement",
            icon: "📈",
            priority: RecommendationPriority::High,
            items: vec![
                format!(
                    "Your CIBIL score is {cibil}. Aim for {TARGET_CIBIL}+ for better approval chances."
                ),
                format!(
                    "Pay all bills on time for the next 6-12 months to improve your score by {} points.",
                    TARGET_CIBIL - cibil
                ),
            ],
        });
    }

    if loan_amount > income * 3.0 {
        let suggested_amount = (income * 2.5).trunc();
        blocks.push(RecommendationBlock {
            title: "Loan Amount Adjustment",
            icon: "💰",
            priority: RecommendationPriority::High,
            items: vec![
                format!(
                    "Your requested amount ({}) is high relative to your income.",
                    format_rupees(loan_amount)
                ),
                format!(
                    "Consider reducing to {} for better approval odds.",
                    format_rupees(suggested_amount)
                ),
                "This keeps your loan-to-income ratio within acceptable limits.".to_string(),
            ],
        });
    }

    if total_assets < loan_amount * 0.5 {
        let shortfall = (loan_amount * 0.5 - total_assets).trunc();
        blocks.push(RecommendationBlock {
            title: "Build Your Assets",
            icon: "🏠",
            priority: RecommendationPriority::Medium,
            items: vec![
                format!(
                    "Total assets: {}. Banks prefer assets worth at least 50% of the loan.",
                    format_rupees(total_assets)
                ),
                format!(
                    "Consider building savings or assets worth {} more.",
                    format_rupees(shortfall)
                ),
                "Assets show financial stability and improve approval chances significantly."
                    .to_string(),
            ],
        });
    }

    blocks
}

fn approval_block(application: &LoanApplication) -> RecommendationBlock {
    let mut items = vec![
        "Your loan is likely to be approved! Here are some tips:".to_string(),
        "Maintain your CIBIL score by making timely payments.".to_string(),
        "Keep your credit utilization below 30% of available credit.".to_string(),
        "Consider setting up auto-pay to never miss a payment.".to_string(),
    ];

    if application.cibil_score >= 800 {
        items.push("Excellent CIBIL score! You may be eligible for lower interest rates.".to_string());
    }

    RecommendationBlock {
        title: "Congratulations! Optimization Tips",
        icon: "🎉",
        priority: RecommendationPriority::Info,
        items,
    }
}
