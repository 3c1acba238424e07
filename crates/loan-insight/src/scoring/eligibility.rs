use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub income: f64,
    pub cibil: u16,
    pub loan_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityFeedback {
    pub text: &'static str,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub score: u8,
    pub feedback: Vec<EligibilityFeedback>,
    pub recommendation: &'static str,
}

/// Quick pre-check from three numbers, without the classifier.
pub fn check_eligibility(request: &EligibilityRequest) -> EligibilityReport {
    let mut eligible = true;
    let mut score = 0u8;
    let mut feedback = Vec::with_capacity(3);
    let mut note = |text, kind| feedback.push(EligibilityFeedback { text, kind });

    if request.cibil >= 750 {
        score += 40;
        note("Excellent CIBIL score!", FeedbackKind::Success);
    } else if request.cibil >= 650 {
        score += 25;
        note("Good CIBIL score", FeedbackKind::Info);
    } else {
        eligible = false;
        note("CIBIL score too low (need 650+)", FeedbackKind::Warning);
    }

    if request.loan_amount <= request.income * 3.0 {
        score += 30;
        note("Loan amount is reasonable", FeedbackKind::Success);
    } else {
        score += 10;
        note("High loan-to-income ratio", FeedbackKind::Warning);
    }

    if request.income >= 300_000.0 {
        score += 30;
        note("Good income level", FeedbackKind::Success);
    } else {
        score += 15;
        note("Modest income level", FeedbackKind::Info);
    }

    let recommendation = if score >= 70 {
        "Proceed with full application"
    } else {
        "Consider improving factors"
    };

    EligibilityReport {
        eligible,
        score,
        feedback,
        recommendation,
    }
}
