use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::export::{
    export_predictions_csv, export_summary_csv, render_text_report, ReportError, ReportOwner,
};
use super::pdf::render_pdf_report;
use super::workbook::export_workbook;
use crate::accounts::AccountRepository;
use crate::gamification::{BadgeDescriptor, BadgeRepository, GamificationEngine, UserAction};
use crate::predictions::domain::{PredictionRecord, UserId};
use crate::predictions::repository::PredictionRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Workbook,
    PdfReport,
    PredictionsCsv,
    SummaryCsv,
    TextReport,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Workbook,
        ExportFormat::PdfReport,
        ExportFormat::PredictionsCsv,
        ExportFormat::SummaryCsv,
        ExportFormat::TextReport,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ExportFormat::Workbook => "workbook",
            ExportFormat::PdfReport => "pdf_report",
            ExportFormat::PredictionsCsv => "predictions_csv",
            ExportFormat::SummaryCsv => "summary_csv",
            ExportFormat::TextReport => "text_report",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Workbook => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::PdfReport => "application/pdf",
            ExportFormat::PredictionsCsv | ExportFormat::SummaryCsv => "text/csv; charset=utf-8",
            ExportFormat::TextReport => "text/plain; charset=utf-8",
        }
    }

    /// Trailing part of the download name, also the last path segment of the export route.
    pub const fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Workbook => "predictions.xlsx",
            ExportFormat::PdfReport => "report.pdf",
            ExportFormat::PredictionsCsv => "predictions.csv",
            ExportFormat::SummaryCsv => "summary.csv",
            ExportFormat::TextReport => "report.txt",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.file_name() == name)
    }
}

/// Rendered export ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub filename: String,
    pub body: Vec<u8>,
    /// Set only on the export that first earned the badge.
    pub new_badge: Option<BadgeDescriptor>,
}

/// Builds user exports and credits the export badge.
pub struct ReportService<P, A, B> {
    predictions: Arc<P>,
    accounts: Arc<A>,
    gamification: GamificationEngine<B>,
}

impl<P, A, B> ReportService<P, A, B>
where
    P: PredictionRepository + 'static,
    A: AccountRepository + 'static,
    B: BadgeRepository + 'static,
{
    pub fn new(predictions: Arc<P>, accounts: Arc<A>, gamification: GamificationEngine<B>) -> Self {
        Self {
            predictions,
            accounts,
            gamification,
        }
    }

    pub fn export(
        &self,
        user_id: UserId,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<ExportDocument, ReportError> {
        let history: Vec<PredictionRecord> = self.predictions.history(user_id)?;
        let owner = self.owner(user_id)?;

        let body = match format {
            ExportFormat::Workbook => export_workbook(&history)?,
            ExportFormat::PdfReport => render_pdf_report(&history, &owner, now)?,
            ExportFormat::PredictionsCsv => export_predictions_csv(&history)?.into_bytes(),
            ExportFormat::SummaryCsv => export_summary_csv(&history)?.into_bytes(),
            ExportFormat::TextReport => render_text_report(&history, &owner, now)?.into_bytes(),
        };

        let new_badge = self
            .gamification
            .record_action(user_id, UserAction::ExportedReport, now)?;
        info!(
            user_id = user_id.0,
            format = format.label(),
            records = history.len(),
            "report exported"
        );

        Ok(ExportDocument {
            format,
            filename: format!(
                "loan_predictions_{}_{}_{}",
                file_stem(&owner.username),
                now.format("%Y%m%d"),
                format.file_name()
            ),
            body,
            new_badge,
        })
    }

    fn owner(&self, user_id: UserId) -> Result<ReportOwner, ReportError> {
        Ok(match self.accounts.find_by_id(user_id)? {
            Some(user) => ReportOwner {
                username: user.username,
                email: Some(user.email),
            },
            None => ReportOwner {
                username: format!("user-{}", user_id.0),
                email: None,
            },
        })
    }
}

/// ASCII-only stem safe inside a quoted `content-disposition` filename.
fn file_stem(username: &str) -> String {
    username
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
