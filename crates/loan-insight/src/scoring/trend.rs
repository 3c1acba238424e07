use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::predictions::domain::{CreditScoreEntry, PredictionRecord, ScoreSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub score: u16,
    pub source: ScoreSource,
}

/// CIBIL readings from the trailing window, oldest day first.
///
/// Explicit entries are merged ahead of prediction readings and the sort is stable, so
/// same-day points keep that merge order; nothing finer is guaranteed between sources.
pub fn trend_history(
    entries: &[CreditScoreEntry],
    records: &[PredictionRecord],
    now: DateTime<Utc>,
    window_days: u32,
) -> Vec<TrendPoint> {
    let cutoff = window_start(now, window_days);

    let mut points: Vec<TrendPoint> = entries
        .iter()
        .filter(|entry| entry.recorded_at >= cutoff)
        .map(|entry| TrendPoint {
            date: entry.recorded_at.date_naive(),
            score: entry.cibil_score,
            source: entry.source,
        })
        .chain(
            records
                .iter()
                .filter(|record| record.created_at >= cutoff)
                .map(|record| TrendPoint {
                    date: record.created_at.date_naive(),
                    score: record.application.cibil_score,
                    source: ScoreSource::Prediction,
                }),
        )
        .collect();

    points.sort_by_key(|point| point.date);
    points
}

/// Earliest instant inside the window; a window reaching past chrono's range covers everything.
fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(window_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
