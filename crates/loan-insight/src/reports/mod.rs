//! Aggregates, dashboard views, and exports over a user's predictions.

pub mod export;
pub mod pdf;
pub mod router;
pub mod service;
pub mod summary;
pub mod workbook;

pub use export::{
    export_predictions_csv, export_summary_csv, render_text_report, report_lines, LineStyle,
    ReportError, ReportLine, ReportOwner, PREDICTION_COLUMNS,
};
pub use pdf::render_pdf_report;
pub use router::report_router;
pub use service::{ExportDocument, ExportFormat, ReportService};
pub use summary::{AnalyticsData, AnalyticsPoint, DashboardView, PredictionSummary};
pub use workbook::{export_workbook, PREDICTIONS_SHEET, SUMMARY_SHEET};
