use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::classifier::{ClassifierError, FeatureVector, LoanClassifier};
use super::domain::{
    ApplicationValidationError, LoanApplication, NewPrediction, PredictionRecord, UserId, Verdict,
};
use super::repository::{PredictionRepository, RepositoryError};
use crate::gamification::{
    BadgeDescriptor, BadgeRepository, GamificationEngine, GamificationError,
};
use crate::scoring::{
    feature_importance, generate_recommendations, FeatureContribution, Recommendations,
};

/// Everything returned to the caller after a successful prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub record: PredictionRecord,
    pub recommendations: Recommendations,
    pub feature_importance: Vec<FeatureContribution>,
    pub new_badges: Vec<BadgeDescriptor>,
}

/// Service composing the classifier, prediction store, and badge engine.
pub struct PredictionService<P, B> {
    predictions: Arc<P>,
    classifier: Arc<dyn LoanClassifier>,
    gamification: GamificationEngine<B>,
}

impl<P, B> PredictionService<P, B>
where
    P: PredictionRepository + 'static,
    B: BadgeRepository + 'static,
{
    pub fn new(
        predictions: Arc<P>,
        classifier: Arc<dyn LoanClassifier>,
        gamification: GamificationEngine<B>,
    ) -> Self {
        Self {
            predictions,
            classifier,
            gamification,
        }
    }

    /// Classify and store one application, then run the history badge pass.
    ///
    /// Nothing is stored when validation or the classifier fails.
    pub fn submit(
        &self,
        user_id: UserId,
        application: LoanApplication,
        now: DateTime<Utc>,
    ) -> Result<PredictionOutcome, PredictionServiceError> {
        application.validate()?;

        let features = FeatureVector::from_application(&application);
        let output = self.classifier.classify(&features).map_err(|err| {
            warn!(user_id = user_id.0, error = %err, "classifier rejected request");
            match err {
                ClassifierError::Unavailable(reason) => {
                    PredictionServiceError::ClassifierUnavailable(reason)
                }
                other => PredictionServiceError::Classifier(other),
            }
        })?;

        let verdict = if output.approved {
            Verdict::Approved
        } else {
            Verdict::Rejected
        };
        let record = self.predictions.append(NewPrediction {
            user_id,
            application,
            verdict,
            probability: as_percentage(output.probability),
            created_at: now,
        })?;
        info!(
            user_id = user_id.0,
            prediction_id = record.id.0,
            verdict = verdict.label(),
            probability = record.probability,
            "prediction stored"
        );

        let history = self.predictions.history(user_id)?;
        let new_badges = self
            .gamification
            .check_and_award_badges(user_id, &history, now)?;

        Ok(PredictionOutcome {
            recommendations: generate_recommendations(&record.application, verdict),
            feature_importance: feature_importance(&record.application),
            new_badges,
            record,
        })
    }

    /// Most recent first.
    pub fn history(&self, user_id: UserId) -> Result<Vec<PredictionRecord>, PredictionServiceError> {
        Ok(self.predictions.history(user_id)?)
    }
}

/// Probability in `[0, 1]` to a percentage rounded to two decimals.
fn as_percentage(probability: f64) -> f64 {
    (probability.clamp(0.0, 1.0) * 10_000.0).round() / 100.0
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error(transparent)]
    Validation(#[from] ApplicationValidationError),
    #[error("prediction model unavailable: {0}")]
    ClassifierUnavailable(String),
    #[error("prediction failed: {0}")]
    Classifier(ClassifierError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Gamification(#[from] GamificationError),
}
