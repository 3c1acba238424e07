use serde::Serialize;

use super::money::format_rupees;
use crate::predictions::domain::PredictionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueImpact {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditIssue {
    pub icon: &'static str,
    pub issue: &'static str,
    pub explanation: String,
    pub severity: IssueSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<IssueImpact>,
}

/// Flags weak spots in the latest application, most severe first.
pub fn analyze_credit_issues(latest: Option<&PredictionRecord>) -> Vec<CreditIssue> {
    let Some(record) = latest else {
        return vec![CreditIssue {
            icon: "📊",
            issue: "No Credit History",
            explanation: "Make your first loan prediction to see personalized insights.".to_string(),
            severity: IssueSeverity::Info,
            impact: None,
        }];
    };
    let application = &record.application;
    let mut issues = Vec::new();

    let cibil = application.cibil_score;
    if cibil < 650 {
        issues.push(CreditIssue {
            icon: "🔴",
            issue: "Poor Credit Score",
            explanation: format!(
                "Your CIBIL score of {cibil} is below the recommended 650. This significantly reduces loan approval chances."
            ),
            severity: IssueSeverity::Critical,
            impact: Some(IssueImpact::VeryHigh),
        });
    } else if cibil < 700 {
        issues.push(CreditIssue {
            icon: "🟡",
            issue: "Below Average Credit Score",
            explanation: format!(
                "Your CIBIL score of {cibil} is below the ideal 750+. Improving this can unlock better interest rates."
            ),
            severity: IssueSeverity::Warning,
            impact: Some(IssueImpact::High),
        });
    }

    let monthly_income = application.monthly_income();
    let loan_amount = application.loan_amount;
    if loan_amount > monthly_income * 10.0 {
        issues.push(CreditIssue {
            icon: "💰",
            issue: "High Loan-to-Income Ratio",
            explanation: format!(
                "Your loan amount ({}) is very high compared to your monthly income ({}).",
                format_rupees(loan_amount),
                format_rupees(monthly_income)
            ),
            severity: IssueSeverity::Warning,
            impact: Some(IssueImpact::High),
        });
    }

    let total_assets = application.total_assets();
    if total_assets < loan_amount * 0.3 {
        issues.push(CreditIssue {
            icon: "🏠",
            issue: "Low Asset Coverage",
            explanation: format!(
                "Your assets ({}) are less than 30% of your loan amount. This increases risk perception.",
                format_rupees(total_assets)
            ),
            severity: IssueSeverity::Warning,
            impact: Some(IssueImpact::Medium),
        });
    }

    if application.no_of_dependents > 3 {
        issues.push(CreditIssue {
            icon: "👨‍👩‍👧‍👦",
            issue: "Multiple Dependents",
            explanation: format!(
                "With {} dependents, your disposable income may be limited.",
                application.no_of_dependents
            ),
            severity: IssueSeverity::Info,
            impact: Some(IssueImpact::Low),
        });
    }

    if issues.is_empty() {
        issues.push(CreditIssue {
            icon: "✅",
            issue: "Healthy Credit Profile",
            explanation: "Your credit profile looks strong! Keep maintaining good financial habits."
                .to_string(),
            severity: IssueSeverity::Success,
            impact: Some(IssueImpact::None),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictions::domain::LoanApplication;
    use crate::scoring::tests::{application, record};

    fn titles(issues: &[CreditIssue]) -> Vec<&'static str> {
        issues.iter().map(|issue| issue.issue).collect()
    }

    #[test]
    fn missing_history_reports_single_info_issue() {
        let issues = analyze_credit_issues(None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue, "No Credit History");
        assert_eq!(issues[0].severity, IssueSeverity::Info);
    }

    #[test]
    fn healthy_profile_reports_success() {
        let app = LoanApplication {
            cibil_score: 760,
            ..application()
        };
        let issues = analyze_credit_issues(Some(&record(app)));
        assert_eq!(titles(&issues), vec!["Healthy Credit Profile"]);
        assert_eq!(issues[0].severity, IssueSeverity::Success);
    }

    #[test]
    fn reports_every_matching_issue_in_priority_order() {
        let app = LoanApplication {
            cibil_score: 600,
            income_annum: 600_000.0,
            loan_amount: 5_000_000.0,
            residential_assets_value: 500_000.0,
            commercial_assets_value: 0.0,
            luxury_assets_value: 0.0,
            bank_asset_value: 250_000.0,
            no_of_dependents: 4,
            ..application()
        };

        let issues = analyze_credit_issues(Some(&record(app)));

        assert_eq!(
            titles(&issues),
            vec![
                "Poor Credit Score",
                "High Loan-to-Income Ratio",
                "Low Asset Coverage",
                "Multiple Dependents",
            ]
        );
        assert_eq!(issues[0].severity, IssueSeverity::Critical);
        assert_eq!(
            issues[1].explanation,
            "Your loan amount (₹5,000,000) is very high compared to your monthly income (₹50,000)."
        );
        assert_eq!(
            issues[2].explanation,
            "Your assets (₹750,000) are less than 30% of your loan amount. This increases risk perception."
        );
    }

    #[test]
    fn cibil_bands_are_mutually_exclusive() {
        let app = LoanApplication {
            cibil_score: 680,
            ..application()
        };
        let issues = analyze_credit_issues(Some(&record(app)));
        assert_eq!(titles(&issues), vec!["Below Average Credit Score"]);
        assert_eq!(issues[0].severity, IssueSeverity::Warning);
    }
}
