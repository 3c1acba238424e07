use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::gamification::GamificationEngine;
use crate::predictions::domain::{ScoreSource, UserId};
use crate::predictions::router::submit_handler;
use crate::predictions::{insight_router, prediction_router, PredictionService};
use crate::store::InMemoryStore;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn application_json() -> serde_json::Value {
    json!({
        "no_of_dependents": 2,
        "education": "Graduate",
        "self_employed": false,
        "income_annum": 1200000.0,
        "loan_amount": 900000.0,
        "loan_term": 120,
        "cibil_score": 720,
        "residential_assets_value": 600000.0,
        "commercial_assets_value": 200000.0,
        "luxury_assets_value": 100000.0,
        "bank_asset_value": 100000.0
    })
}

#[tokio::test]
async fn submit_route_returns_outcome_and_history_lists_it() {
    let harness = harness();
    let router = prediction_router(Arc::clone(&harness.predictions));

    let response = router
        .clone()
        .oneshot(post_json("/api/v1/users/7/predictions", application_json()))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["verdict"], "Approved");
    assert_eq!(body["record"]["user_id"], 7);
    assert_eq!(body["new_badges"][0]["key"], "first_prediction");

    let response = router
        .oneshot(get("/api/v1/users/7/predictions"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn not_graduate_label_is_accepted() {
    let harness = harness();
    let router = prediction_router(Arc::clone(&harness.predictions));
    let mut payload = application_json();
    payload["education"] = json!("Not Graduate");

    let response = router
        .oneshot(post_json("/api/v1/users/1/predictions", payload))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["application"]["education"], "Not Graduate");
}

#[tokio::test]
async fn submit_handler_maps_validation_to_unprocessable() {
    let harness = harness();
    let mut invalid = application();
    invalid.loan_amount = -1.0;

    let response = submit_handler::<InMemoryStore, InMemoryStore>(
        State(Arc::clone(&harness.predictions)),
        Path(1),
        axum::Json(invalid),
    )
    .await;

    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().expect("message").contains("loan_amount"));
}

#[tokio::test]
async fn submit_handler_maps_repository_failure_to_internal_error() {
    let service = Arc::new(PredictionService::new(
        Arc::new(UnavailableRepository),
        Arc::new(CutoffClassifier { cutoff: 650.0 }),
        GamificationEngine::new(Arc::new(InMemoryStore::new())),
    ));

    let response = submit_handler::<UnavailableRepository, InMemoryStore>(
        State(service),
        Path(1),
        axum::Json(application()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unavailable_model_only_blocks_predictions() {
    let harness = unavailable_harness();
    let router = prediction_router(Arc::clone(&harness.predictions))
        .merge(insight_router(Arc::clone(&harness.insights)));

    let response = router
        .clone()
        .oneshot(post_json("/api/v1/users/1/predictions", application_json()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    for uri in [
        "/api/v1/users/1/insights",
        "/api/v1/users/1/trend?days=30",
        "/api/v1/users/1/analytics",
        "/api/v1/users/1/dashboard",
        "/api/v1/users/1/badges",
    ] {
        let response = router.clone().oneshot(get(uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn analytics_route_reports_missing_data() {
    let harness = harness();
    let router = insight_router(Arc::clone(&harness.insights));

    let response = router
        .oneshot(get("/api/v1/users/3/analytics"))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "has_data": false }));
}

#[tokio::test]
async fn credit_score_route_records_and_validates() {
    let harness = harness();
    let router = insight_router(Arc::clone(&harness.insights));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/users/3/credit-scores",
            json!({ "cibil_score": 710 }),
        ))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["source"], "manual");

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/users/3/credit-scores",
            json!({ "cibil_score": 120, "source": "api" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(get("/api/v1/users/3/trend"))
        .await
        .expect("response");
    let (_, body) = json_body(response).await;
    assert_eq!(body[0]["score"], 710);
}

#[tokio::test]
async fn trend_route_accepts_largest_window() {
    let harness = harness();
    harness
        .insights
        .record_credit_score(UserId(4), 705, ScoreSource::Manual, now())
        .expect("score");
    let router = insight_router(Arc::clone(&harness.insights));

    let response = router
        .oneshot(get(&format!("/api/v1/users/4/trend?days={}", u32::MAX)))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["score"], 705);
}

#[tokio::test]
async fn eligibility_and_action_routes_award_badges() {
    let harness = harness();
    let router = insight_router(Arc::clone(&harness.insights));

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/users/5/eligibility",
            json!({ "income": 250000.0, "cibil": 600, "loan_amount": 900000.0 }),
        ))
        .await
        .expect("response");
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["eligible"], false);
    assert_eq!(body["score"], 25);
    assert_eq!(body["feedback"][0]["type"], "warning");
    assert_eq!(body["recommendation"], "Consider improving factors");
    assert_eq!(body["new_badge"]["key"], "calculator_used");

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/users/5/actions",
            json!({ "action": "uploaded_statement" }),
        ))
        .await
        .expect("response");
    let (_, body) = json_body(response).await;
    assert_eq!(body["new_badge"]["key"], "statement_uploaded");

    let response = router
        .oneshot(get("/api/v1/users/5/badges"))
        .await
        .expect("response");
    let (_, body) = json_body(response).await;
    assert_eq!(body["points"], 20);
    assert_eq!(body["badges"].as_array().map(Vec::len), Some(2));
}
