use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{LoanApplication, ScoreSource, UserId};
use super::insights::{InsightError, InsightService};
use super::repository::{CreditHistoryRepository, PredictionRepository, RepositoryError};
use super::service::{PredictionService, PredictionServiceError};
use crate::gamification::{BadgeRepository, GamificationError, UserAction};
use crate::scoring::EligibilityRequest;

/// Prediction submission and history.
pub fn prediction_router<P, B>(service: Arc<PredictionService<P, B>>) -> Router
where
    P: PredictionRepository + 'static,
    B: BadgeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/predictions",
            post(submit_handler::<P, B>).get(history_handler::<P, B>),
        )
        .with_state(service)
}

/// Insight, analytics, calculator, and badge endpoints.
pub fn insight_router<P, C, B>(service: Arc<InsightService<P, C, B>>) -> Router
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:user_id/insights",
            get(insights_handler::<P, C, B>),
        )
        .route("/api/v1/users/:user_id/trend", get(trend_handler::<P, C, B>))
        .route(
            "/api/v1/users/:user_id/analytics",
            get(analytics_handler::<P, C, B>),
        )
        .route(
            "/api/v1/users/:user_id/dashboard",
            get(dashboard_handler::<P, C, B>),
        )
        .route(
            "/api/v1/users/:user_id/credit-scores",
            post(credit_score_handler::<P, C, B>),
        )
        .route(
            "/api/v1/users/:user_id/eligibility",
            post(eligibility_handler::<P, C, B>),
        )
        .route("/api/v1/users/:user_id/badges", get(badges_handler::<P, C, B>))
        .route(
            "/api/v1/users/:user_id/actions",
            post(action_handler::<P, C, B>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrendQuery {
    pub(crate) days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreditScoreRequest {
    pub(crate) cibil_score: u16,
    #[serde(default = "manual_source")]
    pub(crate) source: ScoreSource,
}

fn manual_source() -> ScoreSource {
    ScoreSource::Manual
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionRequest {
    pub(crate) action: UserAction,
}

pub(crate) async fn submit_handler<P, B>(
    State(service): State<Arc<PredictionService<P, B>>>,
    Path(user_id): Path<u64>,
    axum::Json(application): axum::Json<LoanApplication>,
) -> Response
where
    P: PredictionRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.submit(UserId(user_id), application, Utc::now()) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => prediction_error(error),
    }
}

pub(crate) async fn history_handler<P, B>(
    State(service): State<Arc<PredictionService<P, B>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    P: PredictionRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.history(UserId(user_id)) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(error) => prediction_error(error),
    }
}

pub(crate) async fn insights_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.insights(UserId(user_id), Utc::now()) {
        Ok(insights) => (StatusCode::OK, axum::Json(insights)).into_response(),
        Err(error) => insight_error(error),
    }
}

pub(crate) async fn trend_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
    Query(query): Query<TrendQuery>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.trend(UserId(user_id), Utc::now(), query.days) {
        Ok(trend) => (StatusCode::OK, axum::Json(trend)).into_response(),
        Err(error) => insight_error(error),
    }
}

pub(crate) async fn analytics_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.analytics(UserId(user_id)) {
        Ok(Some(data)) => {
            let payload = json!({ "has_data": true, "data": data });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(None) => {
            let payload = json!({ "has_data": false });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => insight_error(error),
    }
}

pub(crate) async fn dashboard_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.dashboard(UserId(user_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => insight_error(error),
    }
}

pub(crate) async fn credit_score_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
    axum::Json(request): axum::Json<CreditScoreRequest>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.record_credit_score(
        UserId(user_id),
        request.cibil_score,
        request.source,
        Utc::now(),
    ) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => insight_error(error),
    }
}

pub(crate) async fn eligibility_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
    axum::Json(request): axum::Json<EligibilityRequest>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.check_eligibility(UserId(user_id), &request, Utc::now()) {
        Ok(check) => (StatusCode::OK, axum::Json(check)).into_response(),
        Err(error) => insight_error(error),
    }
}

pub(crate) async fn badges_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.badges(UserId(user_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => insight_error(error),
    }
}

pub(crate) async fn action_handler<P, C, B>(
    State(service): State<Arc<InsightService<P, C, B>>>,
    Path(user_id): Path<u64>,
    axum::Json(request): axum::Json<ActionRequest>,
) -> Response
where
    P: PredictionRepository + 'static,
    C: CreditHistoryRepository + 'static,
    B: BadgeRepository + 'static,
{
    match service.record_action(UserId(user_id), request.action, Utc::now()) {
        Ok(new_badge) => {
            let payload = json!({ "new_badge": new_badge });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => insight_error(error),
    }
}

fn prediction_error(error: PredictionServiceError) -> Response {
    let status = match &error {
        PredictionServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PredictionServiceError::ClassifierUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PredictionServiceError::Repository(error)
        | PredictionServiceError::Gamification(GamificationError::Repository(error)) => {
            repository_status(error)
        }
        PredictionServiceError::Classifier(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_body(status, error.to_string())
}

fn insight_error(error: InsightError) -> Response {
    let status = match &error {
        InsightError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InsightError::Repository(error)
        | InsightError::Gamification(GamificationError::Repository(error)) => {
            repository_status(error)
        }
    };
    error_body(status, error.to_string())
}

pub(crate) fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_body(status: StatusCode, message: String) -> Response {
    let payload = json!({ "error": message });
    (status, axum::Json(payload)).into_response()
}
