use super::domain::{CreditScoreEntry, NewPrediction, PredictionRecord, UserId};

/// Append-only prediction storage.
pub trait PredictionRepository: Send + Sync {
    fn append(&self, prediction: NewPrediction) -> Result<PredictionRecord, RepositoryError>;
    /// All records for the user, most recent first.
    fn history(&self, user_id: UserId) -> Result<Vec<PredictionRecord>, RepositoryError>;

    fn latest(&self, user_id: UserId) -> Result<Option<PredictionRecord>, RepositoryError> {
        Ok(self.history(user_id)?.into_iter().next())
    }
}

/// Explicit CIBIL readings used by the trend view.
pub trait CreditHistoryRepository: Send + Sync {
    fn record(&self, entry: CreditScoreEntry) -> Result<(), RepositoryError>;
    /// Entries for the user in the order they were recorded.
    fn entries(&self, user_id: UserId) -> Result<Vec<CreditScoreEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
