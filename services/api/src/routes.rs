use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use loan_insight::accounts::{account_router, OtpNotifier};
use loan_insight::predictions::{insight_router, prediction_router};
use loan_insight::reports::report_router;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<N>(services: &Services<N>) -> Router
where
    N: OtpNotifier + 'static,
{
    prediction_router(Arc::clone(&services.predictions))
        .merge(insight_router(Arc::clone(&services.insights)))
        .merge(report_router(Arc::clone(&services.reports)))
        .merge(account_router(Arc::clone(&services.accounts)))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::test_config;
    use axum::body::Body;
    use axum::http::Request;
    use loan_insight::accounts::LogNotifier;
    use loan_insight::predictions::UnavailableClassifier;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> Router {
        let services = Services::build(
            &test_config(),
            Arc::new(UnavailableClassifier::new("no artifact in tests")),
            Arc::new(LogNotifier),
        );
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        };
        with_service_routes(&services).layer(Extension(state))
    }

    async fn status_of(router: Router, request: Request<Body>) -> StatusCode {
        router.oneshot(request).await.expect("response").status()
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        let get_ready = || Request::get("/ready").body(Body::empty()).expect("request");
        assert_eq!(
            status_of(app(false), get_ready()).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(app(true), get_ready()).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_render_as_text() {
        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn module_routes_are_mounted() {
        let router = app(true);
        let empty_export = Request::get("/api/v1/users/1/exports/summary.csv")
            .body(Body::empty())
            .expect("request");
        assert_eq!(
            status_of(router.clone(), empty_export).await,
            StatusCode::NOT_FOUND
        );

        let insights = Request::get("/api/v1/users/1/insights")
            .body(Body::empty())
            .expect("request");
        assert_eq!(status_of(router.clone(), insights).await, StatusCode::OK);

        let login = Request::post("/api/v1/accounts/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": "nobody@example.com", "password": "x" }).to_string(),
            ))
            .expect("request");
        assert_eq!(status_of(router, login).await, StatusCode::UNAUTHORIZED);
    }
}
