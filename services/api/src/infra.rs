use loan_insight::accounts::{AccountService, LogNotifier};
use loan_insight::config::{AppConfig, ClassifierConfig};
use loan_insight::error::AppError;
use loan_insight::gamification::GamificationEngine;
use loan_insight::predictions::{
    InsightService, LoanApplication, LoanClassifier, LogisticClassifier, PredictionService,
    UnavailableClassifier,
};
use loan_insight::reports::ReportService;
use loan_insight::store::InMemoryStore;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Predictions = PredictionService<InMemoryStore, InMemoryStore>;
pub(crate) type Insights = InsightService<InMemoryStore, InMemoryStore, InMemoryStore>;
pub(crate) type Reports = ReportService<InMemoryStore, InMemoryStore, InMemoryStore>;
pub(crate) type Accounts<N> = AccountService<InMemoryStore, N>;

/// Every service wired to one shared in-memory store.
pub(crate) struct Services<N = LogNotifier> {
    pub(crate) predictions: Arc<Predictions>,
    pub(crate) insights: Arc<Insights>,
    pub(crate) reports: Arc<Reports>,
    pub(crate) accounts: Arc<Accounts<N>>,
}

impl<N> Services<N>
where
    N: loan_insight::accounts::OtpNotifier + 'static,
{
    pub(crate) fn build(
        config: &AppConfig,
        classifier: Arc<dyn LoanClassifier>,
        notifier: Arc<N>,
    ) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let engine = GamificationEngine::new(Arc::clone(&store));

        Self {
            predictions: Arc::new(PredictionService::new(
                Arc::clone(&store),
                classifier,
                engine.clone(),
            )),
            insights: Arc::new(InsightService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                engine.clone(),
                config.insights,
            )),
            reports: Arc::new(ReportService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                engine,
            )),
            accounts: Arc::new(AccountService::new(store, notifier, config.accounts)),
        }
    }
}

/// Loads the artifact, falling back to a stand-in that fails every prediction so the rest of
/// the service keeps running.
pub(crate) fn load_classifier(config: &ClassifierConfig) -> Arc<dyn LoanClassifier> {
    match LogisticClassifier::from_path(&config.model_path) {
        Ok(model) => {
            info!(path = %config.model_path.display(), "loan classifier loaded");
            Arc::new(model)
        }
        Err(err) => {
            warn!(
                path = %config.model_path.display(),
                error = %err,
                "loan classifier unavailable; predictions will be rejected"
            );
            Arc::new(UnavailableClassifier::new(err.to_string()))
        }
    }
}

pub(crate) fn read_application(path: &Path) -> Result<LoanApplication, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    use loan_insight::config::{
        AccountConfig, AppEnvironment, InsightConfig, ServerConfig, TelemetryConfig,
    };

    AppConfig {
        environment: AppEnvironment::Test,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        telemetry: TelemetryConfig {
            log_level: "info".to_string(),
        },
        classifier: ClassifierConfig {
            model_path: std::path::PathBuf::from(ClassifierConfig::DEFAULT_MODEL_PATH),
        },
        insights: InsightConfig::default(),
        accounts: AccountConfig::default(),
    }
}
