use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::InsightConfig;
use crate::gamification::GamificationEngine;
use crate::predictions::classifier::{
    ClassifierError, ClassifierOutput, FeatureVector, LoanClassifier, UnavailableClassifier,
};
use crate::predictions::domain::{NewPrediction, PredictionRecord, UserId};
use crate::predictions::repository::{PredictionRepository, RepositoryError};
use crate::predictions::{InsightService, PredictionService};
use crate::store::InMemoryStore;

pub(super) use crate::scoring::tests::application;

/// Approves whenever the CIBIL feature reaches the cutoff.
pub(super) struct CutoffClassifier {
    pub(super) cutoff: f64,
}

impl LoanClassifier for CutoffClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<ClassifierOutput, ClassifierError> {
        let cibil = features.0[6];
        let approved = cibil >= self.cutoff;
        Ok(ClassifierOutput {
            approved,
            probability: if approved { 0.876_54 } else { 0.123_4 },
        })
    }
}

pub(super) struct UnavailableRepository;

impl PredictionRepository for UnavailableRepository {
    fn append(&self, _prediction: NewPrediction) -> Result<PredictionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _user_id: UserId) -> Result<Vec<PredictionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) struct Harness {
    pub(super) store: Arc<InMemoryStore>,
    pub(super) predictions: Arc<PredictionService<InMemoryStore, InMemoryStore>>,
    pub(super) insights: Arc<InsightService<InMemoryStore, InMemoryStore, InMemoryStore>>,
}

pub(super) fn harness_with(classifier: Arc<dyn LoanClassifier>) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let engine = GamificationEngine::new(Arc::clone(&store));
    let predictions = Arc::new(PredictionService::new(
        Arc::clone(&store),
        classifier,
        engine.clone(),
    ));
    let insights = Arc::new(InsightService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        engine,
        InsightConfig::default(),
    ));
    Harness {
        store,
        predictions,
        insights,
    }
}

pub(super) fn harness() -> Harness {
    harness_with(Arc::new(CutoffClassifier { cutoff: 650.0 }))
}

pub(super) fn unavailable_harness() -> Harness {
    harness_with(Arc::new(UnavailableClassifier::new("artifact missing")))
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("body");
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}
