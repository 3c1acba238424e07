//! Boundary to the pre-trained approval model.
//!
//! The model is consumed as an opaque function over an eleven-feature vector. It is loaded once
//! at startup and handed to the prediction service; scoring never touches it.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::domain::{Education, LoanApplication};

pub const FEATURE_COUNT: usize = 11;

/// Feature names in the order the model was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "no_of_dependents",
    "education",
    "self_employed",
    "income_annum",
    "loan_amount",
    "loan_term",
    "cibil_score",
    "residential_assets_value",
    "commercial_assets_value",
    "luxury_assets_value",
    "bank_asset_value",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_application(application: &LoanApplication) -> Self {
        let education = match application.education {
            Education::Graduate => 1.0,
            Education::NotGraduate => 0.0,
        };
        let self_employed = if application.self_employed { 1.0 } else { 0.0 };

        Self([
            f64::from(application.no_of_dependents),
            education,
            self_employed,
            application.income_annum,
            application.loan_amount,
            f64::from(application.loan_term),
            f64::from(application.cibil_score),
            application.residential_assets_value,
            application.commercial_assets_value,
            application.luxury_assets_value,
            application.bank_asset_value,
        ])
    }
}

/// Raw model output before it is turned into a stored verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOutput {
    pub approved: bool,
    /// Approval probability in `[0, 1]`.
    pub probability: f64,
}

pub trait LoanClassifier: Send + Sync {
    fn classify(&self, features: &FeatureVector) -> Result<ClassifierOutput, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read classifier artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("classifier artifact is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("classifier artifact field `{field}` has {actual} values, expected {FEATURE_COUNT}")]
    Shape { field: &'static str, actual: usize },
    #[error("classifier artifact scale for `{0}` must be non-zero")]
    ZeroScale(&'static str),
}

#[derive(Debug, Deserialize)]
struct LogisticArtifact {
    means: Vec<f64>,
    scales: Vec<f64>,
    weights: Vec<f64>,
    intercept: f64,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// Logistic model with its own standard-scaler parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticClassifier {
    means: [f64; FEATURE_COUNT],
    scales: [f64; FEATURE_COUNT],
    weights: [f64; FEATURE_COUNT],
    intercept: f64,
    threshold: f64,
}

fn fixed(field: &'static str, values: Vec<f64>) -> Result<[f64; FEATURE_COUNT], ClassifierError> {
    let actual = values.len();
    values
        .try_into()
        .map_err(|_| ClassifierError::Shape { field, actual })
}

impl LogisticClassifier {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ClassifierError> {
        let artifact: LogisticArtifact = serde_json::from_str(raw)?;
        let scales = fixed("scales", artifact.scales)?;
        if let Some(index) = scales.iter().position(|scale| *scale == 0.0) {
            return Err(ClassifierError::ZeroScale(FEATURE_NAMES[index]));
        }

        Ok(Self {
            means: fixed("means", artifact.means)?,
            scales,
            weights: fixed("weights", artifact.weights)?,
            intercept: artifact.intercept,
            threshold: artifact.threshold,
        })
    }

    fn scale(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (index, value) in features.0.iter().enumerate() {
            scaled[index] = (value - self.means[index]) / self.scales[index];
        }
        scaled
    }
}

impl LoanClassifier for LogisticClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<ClassifierOutput, ClassifierError> {
        let logit = self
            .scale(features)
            .iter()
            .zip(self.weights.iter())
            .fold(self.intercept, |acc, (value, weight)| acc + value * weight);
        let probability = 1.0 / (1.0 + (-logit).exp());

        Ok(ClassifierOutput {
            approved: probability >= self.threshold,
            probability,
        })
    }
}

/// Stand-in installed when the artifact cannot be loaded; every call reports why.
#[derive(Debug, Clone)]
pub struct UnavailableClassifier {
    reason: String,
}

impl UnavailableClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl LoanClassifier for UnavailableClassifier {
    fn classify(&self, _features: &FeatureVector) -> Result<ClassifierOutput, ClassifierError> {
        Err(ClassifierError::Unavailable(self.reason.clone()))
    }
}
