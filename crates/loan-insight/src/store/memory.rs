use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::accounts::domain::{NewUser, User};
use crate::accounts::otp::{PendingVerification, VerificationToken};
use crate::accounts::repository::AccountRepository;
use crate::gamification::badges::BadgeKind;
use crate::gamification::repository::{BadgeGrant, BadgeRepository, EarnedBadge};
use crate::predictions::domain::{
    CreditScoreEntry, NewPrediction, PredictionId, PredictionRecord, UserId,
};
use crate::predictions::repository::{
    CreditHistoryRepository, PredictionRepository, RepositoryError,
};

#[derive(Default)]
struct StoreState {
    predictions: Vec<PredictionRecord>,
    next_prediction_id: u64,
    credit_entries: Vec<CreditScoreEntry>,
    badges: HashMap<UserId, Vec<EarnedBadge>>,
    points: HashMap<UserId, u32>,
    users: Vec<User>,
    next_user_id: u64,
    pending: HashMap<VerificationToken, PendingVerification>,
}

/// Process-local store backing every repository trait behind a single lock.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl PredictionRepository for InMemoryStore {
    fn append(&self, prediction: NewPrediction) -> Result<PredictionRecord, RepositoryError> {
        let mut state = self.state()?;
        state.next_prediction_id += 1;
        let record = PredictionRecord {
            id: PredictionId(state.next_prediction_id),
            user_id: prediction.user_id,
            application: prediction.application,
            verdict: prediction.verdict,
            probability: prediction.probability,
            created_at: prediction.created_at,
        };
        state.predictions.push(record.clone());
        Ok(record)
    }

    fn history(&self, user_id: UserId) -> Result<Vec<PredictionRecord>, RepositoryError> {
        let state = self.state()?;
        let mut records: Vec<PredictionRecord> = state
            .predictions
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        // Ids break timestamp ties so the newest insert stays first.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}

impl CreditHistoryRepository for InMemoryStore {
    fn record(&self, entry: CreditScoreEntry) -> Result<(), RepositoryError> {
        self.state()?.credit_entries.push(entry);
        Ok(())
    }

    fn entries(&self, user_id: UserId) -> Result<Vec<CreditScoreEntry>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .credit_entries
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl BadgeRepository for InMemoryStore {
    fn grant(
        &self,
        user_id: UserId,
        badge: BadgeKind,
        points: u32,
        awarded_at: DateTime<Utc>,
    ) -> Result<BadgeGrant, RepositoryError> {
        let mut state = self.state()?;
        let earned = state.badges.entry(user_id).or_default();
        if earned.iter().any(|held| held.kind == badge) {
            return Ok(BadgeGrant::AlreadyHeld);
        }
        earned.push(EarnedBadge {
            kind: badge,
            awarded_at,
        });
        let total = state.points.entry(user_id).or_insert(0);
        *total = total.saturating_add(points);
        Ok(BadgeGrant::Granted)
    }

    fn earned(&self, user_id: UserId) -> Result<Vec<EarnedBadge>, RepositoryError> {
        let state = self.state()?;
        Ok(state.badges.get(&user_id).cloned().unwrap_or_default())
    }

    fn points(&self, user_id: UserId) -> Result<u32, RepositoryError> {
        let state = self.state()?;
        Ok(state.points.get(&user_id).copied().unwrap_or(0))
    }
}

impl AccountRepository for InMemoryStore {
    fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state()?;
        let taken = state.users.iter().any(|existing| {
            existing.email == user.email || existing.username == user.username
        });
        if taken {
            return Err(RepositoryError::Conflict);
        }

        state.next_user_id += 1;
        let created = User {
            id: UserId(state.next_user_id),
            email: user.email,
            username: user.username,
            password: user.password,
            is_verified: true,
            created_at: user.created_at,
            last_login: None,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state()?;
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state()?;
        Ok(state.users.iter().find(|user| user.email == email).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state()?;
        Ok(state
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    fn record_login(&self, id: UserId, at: DateTime<Utc>) -> Result<User, RepositoryError> {
        let mut state = self.state()?;
        let user = state
            .users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        user.last_login = Some(at);
        Ok(user.clone())
    }

    fn store_pending(&self, pending: PendingVerification) -> Result<(), RepositoryError> {
        let mut state = self.state()?;
        let kind = pending.purpose.kind();
        state
            .pending
            .retain(|_, existing| !(existing.email == pending.email && existing.purpose.kind() == kind));
        state.pending.insert(pending.token.clone(), pending);
        Ok(())
    }

    fn pending(
        &self,
        token: &VerificationToken,
    ) -> Result<Option<PendingVerification>, RepositoryError> {
        let state = self.state()?;
        Ok(state.pending.get(token).cloned())
    }

    fn take_pending(
        &self,
        token: &VerificationToken,
    ) -> Result<Option<PendingVerification>, RepositoryError> {
        Ok(self.state()?.pending.remove(token))
    }
}
