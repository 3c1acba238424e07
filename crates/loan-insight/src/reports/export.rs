use chrono::{DateTime, Utc};

use super::summary::PredictionSummary;
use crate::gamification::GamificationError;
use crate::predictions::domain::PredictionRecord;
use crate::predictions::repository::RepositoryError;
use crate::scoring::money::format_rupees;

pub const PREDICTION_COLUMNS: [&str; 14] = [
    "Date",
    "Loan Amount",
    "Income",
    "CIBIL Score",
    "Education",
    "Self Employed",
    "Dependents",
    "Loan Term",
    "Residential Assets",
    "Commercial Assets",
    "Luxury Assets",
    "Bank Assets",
    "Result",
    "Probability",
];

/// Number of records detailed in the printable report.
pub const REPORT_DETAIL_LIMIT: usize = 10;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Who the printable report is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOwner {
    pub username: String,
    pub email: Option<String>,
}

/// One row per prediction, in the order given.
pub fn export_predictions_csv(records: &[PredictionRecord]) -> Result<String, ReportError> {
    ensure_history(records)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(PREDICTION_COLUMNS)?;
    for record in records {
        let application = &record.application;
        writer.write_record([
            record.created_at.format(TIMESTAMP_FORMAT).to_string(),
            application.loan_amount.to_string(),
            application.income_annum.to_string(),
            application.cibil_score.to_string(),
            application.education.label().to_string(),
            application.employment_label().to_string(),
            application.no_of_dependents.to_string(),
            application.loan_term.to_string(),
            application.residential_assets_value.to_string(),
            application.commercial_assets_value.to_string(),
            application.luxury_assets_value.to_string(),
            application.bank_asset_value.to_string(),
            record.verdict.label().to_string(),
            record.probability.to_string(),
        ])?;
    }

    finish(writer)
}

/// Metric/value pairs built from [`PredictionSummary`].
pub fn export_summary_csv(records: &[PredictionRecord]) -> Result<String, ReportError> {
    ensure_history(records)?;
    let summary = PredictionSummary::from_records(records);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Metric", "Value"])?;
    for (metric, value) in summary_rows(&summary) {
        writer.write_record([metric, value.as_str()])?;
    }

    finish(writer)
}

/// Visual role of a line in the printable report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Body,
    Blank,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub style: LineStyle,
    pub text: String,
}

impl ReportLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    fn body(text: impl Into<String>) -> Self {
        Self::new(LineStyle::Body, text)
    }

    fn blank() -> Self {
        Self::new(LineStyle::Blank, String::new())
    }
}

/// Printable report laid out as styled lines: header, summary table, the ten most recent
/// predictions, and a footer. Both the text and PDF renditions draw from this.
pub fn report_lines(
    records: &[PredictionRecord],
    owner: &ReportOwner,
    generated_at: DateTime<Utc>,
) -> Result<Vec<ReportLine>, ReportError> {
    ensure_history(records)?;
    let summary = PredictionSummary::from_records(records);

    let generated_for = match &owner.email {
        Some(email) => format!("Generated for: {} ({email})", owner.username),
        None => format!("Generated for: {}", owner.username),
    };
    let mut lines = vec![
        ReportLine::new(LineStyle::Title, "Loan Prediction Report"),
        ReportLine::body(generated_for),
        ReportLine::body(format!(
            "Date: {}",
            generated_at.format("%B %d, %Y at %I:%M %p")
        )),
        ReportLine::body(format!("Total Predictions: {}", summary.total)),
        ReportLine::blank(),
        ReportLine::new(LineStyle::Heading, "Summary Statistics"),
    ];
    lines.extend(
        summary_rows(&summary)
            .into_iter()
            .map(|(metric, value)| ReportLine::body(format!("{metric:<22}{value}"))),
    );
    lines.push(ReportLine::blank());

    lines.push(ReportLine::new(LineStyle::Heading, "Prediction Details"));
    for record in records.iter().take(REPORT_DETAIL_LIMIT) {
        let application = &record.application;
        let details = [
            ("Date", record.created_at.format(TIMESTAMP_FORMAT).to_string()),
            ("Loan Amount", format_rupees(application.loan_amount)),
            ("Income", format_rupees(application.income_annum)),
            ("CIBIL Score", application.cibil_score.to_string()),
            ("Result", record.verdict.label().to_string()),
            ("Probability", format!("{}%", record.probability)),
        ];
        lines.extend(
            details
                .into_iter()
                .map(|(label, value)| ReportLine::body(format!("{label:<14}{value}"))),
        );
        lines.push(ReportLine::blank());
    }

    lines.push(ReportLine::new(
        LineStyle::Footer,
        "This report is generated automatically by the Loan Prediction System. \
         For queries, contact your administrator.",
    ));
    Ok(lines)
}

/// Plain-text rendition of [`report_lines`]; titles and headings are underlined.
pub fn render_text_report(
    records: &[PredictionRecord],
    owner: &ReportOwner,
    generated_at: DateTime<Utc>,
) -> Result<String, ReportError> {
    let mut out = String::new();
    for line in report_lines(records, owner, generated_at)? {
        out.push_str(&line.text);
        out.push('\n');
        let rule = match line.style {
            LineStyle::Title => '=',
            LineStyle::Heading => '-',
            LineStyle::Body | LineStyle::Blank | LineStyle::Footer => continue,
        };
        out.push_str(&rule.to_string().repeat(line.text.chars().count()));
        out.push('\n');
    }
    Ok(out)
}

pub(crate) fn summary_rows(summary: &PredictionSummary) -> [(&'static str, String); 6] {
    [
        ("Total Predictions", summary.total.to_string()),
        ("Approved", summary.approved.to_string()),
        ("Rejected", summary.rejected.to_string()),
        ("Approval Rate", format!("{:.1}%", summary.approval_rate)),
        ("Avg Loan Amount", format_rupees(summary.average_loan_amount)),
        ("Avg CIBIL Score", format!("{:.0}", summary.average_cibil)),
    ]
}

pub(crate) fn ensure_history(records: &[PredictionRecord]) -> Result<(), ReportError> {
    if records.is_empty() {
        Err(ReportError::EmptyHistory)
    } else {
        Ok(())
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ReportError> {
    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Encoding(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ReportError::Encoding(err.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no predictions to export")]
    EmptyHistory,
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode export: {0}")]
    Encoding(String),
    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to render pdf: {0}")]
    Pdf(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Gamification(#[from] GamificationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictions::domain::Verdict;
    use crate::scoring::tests::{application, record};
    use chrono::TimeZone;

    fn owner() -> ReportOwner {
        ReportOwner {
            username: "asha".to_string(),
            email: Some("asha@example.com".to_string()),
        }
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(matches!(
            export_predictions_csv(&[]),
            Err(ReportError::EmptyHistory)
        ));
        assert!(matches!(
            export_summary_csv(&[]),
            Err(ReportError::EmptyHistory)
        ));
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).single().expect("valid");
        assert!(matches!(
            render_text_report(&[], &owner(), now),
            Err(ReportError::EmptyHistory)
        ));
    }

    #[test]
    fn prediction_rows_follow_header() {
        let csv = export_predictions_csv(&[record(application())]).expect("export");
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some(PREDICTION_COLUMNS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some(
                "2025-06-01 10:00,900000,1200000,720,Graduate,No,2,120,600000,200000,100000,\
                 100000,Approved,82.5"
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn summary_sheet_formats_metrics() {
        let mut rejected = record(application());
        rejected.verdict = Verdict::Rejected;
        rejected.application.loan_amount = 1_500_000.0;
        let csv = export_summary_csv(&[record(application()), rejected]).expect("export");

        assert!(csv.starts_with("Metric,Value\n"));
        assert!(csv.contains("Total Predictions,2\n"));
        assert!(csv.contains("Approval Rate,50.0%\n"));
        assert!(csv.contains("Avg Loan Amount,\"₹1,200,000\"\n"));
        assert!(csv.contains("Avg CIBIL Score,720\n"));
    }

    #[test]
    fn text_report_includes_owner_summary_and_footer() {
        let now = Utc
            .with_ymd_and_hms(2025, 6, 2, 15, 30, 0)
            .single()
            .expect("valid");
        let report = render_text_report(&[record(application())], &owner(), now).expect("report");

        assert!(report.starts_with("Loan Prediction Report\n"));
        assert!(report.contains("Generated for: asha (asha@example.com)"));
        assert!(report.contains("Date: June 02, 2025 at 03:30 PM"));
        assert!(report.contains("Loan Amount   ₹900,000"));
        assert!(report.contains("Probability   82.5%"));
        assert!(report.trim_end().ends_with("contact your administrator."));
    }

    #[test]
    fn text_report_details_at_most_ten_records() {
        let records: Vec<_> = (0..12).map(|_| record(application())).collect();
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).single().expect("valid");
        let report = render_text_report(&records, &owner(), now).expect("report");

        assert_eq!(report.matches("CIBIL Score   720").count(), 10);
        assert!(report.contains("Total Predictions: 12"));
    }
}
