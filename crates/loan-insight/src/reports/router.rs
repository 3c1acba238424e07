use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;

use super::export::ReportError;
use super::service::{ExportDocument, ExportFormat, ReportService};
use crate::accounts::AccountRepository;
use crate::gamification::{BadgeRepository, GamificationError};
use crate::predictions::domain::UserId;
use crate::predictions::repository::PredictionRepository;
use crate::predictions::router::{error_body, repository_status};

/// Carries the badge key when this export earned "Record Keeper".
pub const NEW_BADGE_HEADER: &str = "x-new-badge";

pub fn report_router<P, A, B>(service: Arc<ReportService<P, A, B>>) -> Router
where
    P: PredictionRepository + 'static,
    A: AccountRepository + 'static,
    B: BadgeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/exports/:file",
            get(export_handler::<P, A, B>),
        )
        .with_state(service)
}

pub(crate) async fn export_handler<P, A, B>(
    State(service): State<Arc<ReportService<P, A, B>>>,
    Path((user_id, file)): Path<(u64, String)>,
) -> Response
where
    P: PredictionRepository + 'static,
    A: AccountRepository + 'static,
    B: BadgeRepository + 'static,
{
    let Some(format) = ExportFormat::from_file_name(&file) else {
        return error_body(StatusCode::NOT_FOUND, format!("unknown export {file}"));
    };

    match service.export(UserId(user_id), format, Utc::now()) {
        Ok(document) => attachment(document),
        Err(error) => {
            let status = match &error {
                ReportError::EmptyHistory => StatusCode::NOT_FOUND,
                ReportError::Repository(error)
                | ReportError::Gamification(GamificationError::Repository(error)) => {
                    repository_status(error)
                }
                ReportError::Csv(_)
                | ReportError::Encoding(_)
                | ReportError::Workbook(_)
                | ReportError::Pdf(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_body(status, error.to_string())
        }
    }
}

fn attachment(document: ExportDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", document.filename);
    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.body,
    )
        .into_response();
    if let Some(badge) = document.new_badge {
        response
            .headers_mut()
            .insert(NEW_BADGE_HEADER, HeaderValue::from_static(badge.key));
    }
    response
}
