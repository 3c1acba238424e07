//! Loan predictions: the classifier boundary, the prediction store, and the services and
//! routes built on top of them.

pub mod classifier;
pub mod domain;
pub mod insights;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{
    ClassifierError, ClassifierOutput, FeatureVector, LoanClassifier, LogisticClassifier,
    UnavailableClassifier, FEATURE_COUNT, FEATURE_NAMES,
};
pub use domain::{
    ApplicationValidationError, CreditScoreEntry, Education, LoanApplication, NewPrediction,
    PredictionId, PredictionRecord, ScoreSource, UserId, Verdict,
};
pub use insights::{EligibilityCheck, InsightError, InsightService};
pub use repository::{CreditHistoryRepository, PredictionRepository, RepositoryError};
pub use router::{insight_router, prediction_router};
pub use service::{PredictionOutcome, PredictionService, PredictionServiceError};
