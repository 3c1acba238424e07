use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::export::{
    ensure_history, summary_rows, ReportError, PREDICTION_COLUMNS, TIMESTAMP_FORMAT,
};
use super::summary::PredictionSummary;
use crate::predictions::domain::PredictionRecord;

pub const PREDICTIONS_SHEET: &str = "Predictions";
pub const SUMMARY_SHEET: &str = "Summary";

/// Spreadsheet export with a "Predictions" sheet (one row per record, numbers kept numeric)
/// and a "Summary" sheet of metric/value pairs from [`PredictionSummary`].
pub fn export_workbook(records: &[PredictionRecord]) -> Result<Vec<u8>, ReportError> {
    ensure_history(records)?;
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(PREDICTIONS_SHEET)?;
    write_header(sheet, &PREDICTION_COLUMNS, &header)?;
    for (row, record) in (1u32..).zip(records) {
        let application = &record.application;
        sheet.write_string(row, 0, record.created_at.format(TIMESTAMP_FORMAT).to_string())?;
        sheet.write_number(row, 1, application.loan_amount)?;
        sheet.write_number(row, 2, application.income_annum)?;
        sheet.write_number(row, 3, f64::from(application.cibil_score))?;
        sheet.write_string(row, 4, application.education.label())?;
        sheet.write_string(row, 5, application.employment_label())?;
        sheet.write_number(row, 6, f64::from(application.no_of_dependents))?;
        sheet.write_number(row, 7, f64::from(application.loan_term))?;
        sheet.write_number(row, 8, application.residential_assets_value)?;
        sheet.write_number(row, 9, application.commercial_assets_value)?;
        sheet.write_number(row, 10, application.luxury_assets_value)?;
        sheet.write_number(row, 11, application.bank_asset_value)?;
        sheet.write_string(row, 12, record.verdict.label())?;
        sheet.write_number(row, 13, record.probability)?;
    }

    let summary = PredictionSummary::from_records(records);
    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    write_header(sheet, &["Metric", "Value"], &header)?;
    for (row, (metric, value)) in (1u32..).zip(summary_rows(&summary)) {
        sheet.write_string(row, 0, metric)?;
        sheet.write_string(row, 1, value)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_header(
    sheet: &mut Worksheet,
    columns: &[&str],
    format: &Format,
) -> Result<(), ReportError> {
    for (col, name) in (0u16..).zip(columns) {
        sheet.write_string_with_format(0, col, *name, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

    use super::*;
    use crate::predictions::domain::Verdict;
    use crate::scoring::tests::{application, record};

    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::String(text) => text.clone(),
            Data::Float(value) => value.to_string(),
            Data::Int(value) => value.to_string(),
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn workbook_has_prediction_and_summary_sheets() {
        let mut rejected = record(application());
        rejected.verdict = Verdict::Rejected;
        rejected.application.loan_amount = 1_500_000.0;
        let bytes = export_workbook(&[record(application()), rejected]).expect("workbook");

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("xlsx");
        assert_eq!(workbook.sheet_names(), vec!["Predictions", "Summary"]);

        let predictions = workbook.worksheet_range(PREDICTIONS_SHEET).expect("predictions");
        let rows: Vec<Vec<String>> = predictions
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], PREDICTION_COLUMNS.map(str::to_string).to_vec());
        assert_eq!(rows[1][0], "2025-06-01 10:00");
        assert_eq!(rows[1][1], "900000");
        assert_eq!(rows[2][12], "Rejected");
        assert_eq!(rows[2][13], "82.5");

        let summary = workbook.worksheet_range(SUMMARY_SHEET).expect("summary");
        let pairs: Vec<(String, String)> = summary
            .rows()
            .map(|row| (cell_text(&row[0]), cell_text(&row[1])))
            .collect();
        assert_eq!(pairs[0], ("Metric".to_string(), "Value".to_string()));
        assert!(pairs.contains(&("Approval Rate".to_string(), "50.0%".to_string())));
        assert!(pairs.contains(&("Avg Loan Amount".to_string(), "₹1,200,000".to_string())));
    }

    #[test]
    fn empty_history_has_no_workbook() {
        assert!(matches!(export_workbook(&[]), Err(ReportError::EmptyHistory)));
    }
}
