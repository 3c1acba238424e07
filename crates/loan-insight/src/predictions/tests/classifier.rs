use crate::predictions::classifier::{
    ClassifierError, FeatureVector, LoanClassifier, LogisticClassifier, UnavailableClassifier,
};

use super::common::application;

fn artifact(weights: &str, threshold: &str) -> String {
    format!(
        r#"{{
            "means": [0, 0, 0, 0, 0, 0, 600, 0, 0, 0, 0],
            "scales": [1, 1, 1, 1, 1, 1, 100, 1, 1, 1, 1],
            "weights": {weights},
            "intercept": 0.0
            {threshold}
        }}"#
    )
}

const CIBIL_ONLY: &str = "[0, 0, 0, 0, 0, 0, 2.0, 0, 0, 0, 0]";

#[test]
fn feature_vector_uses_training_order() {
    let features = FeatureVector::from_application(&application());
    assert_eq!(
        features.0,
        [
            2.0,
            1.0,
            0.0,
            1_200_000.0,
            900_000.0,
            120.0,
            720.0,
            600_000.0,
            200_000.0,
            100_000.0,
            100_000.0
        ]
    );
}

#[test]
fn logistic_model_scales_then_applies_sigmoid() {
    let model = LogisticClassifier::from_json(&artifact(CIBIL_ONLY, "")).expect("artifact");

    let mut at_mean = application();
    at_mean.cibil_score = 600;
    let output = model
        .classify(&FeatureVector::from_application(&at_mean))
        .expect("classify");
    assert!((output.probability - 0.5).abs() < 1e-12);
    assert!(output.approved);

    let mut weak = application();
    weak.cibil_score = 400;
    let output = model
        .classify(&FeatureVector::from_application(&weak))
        .expect("classify");
    let expected = 1.0 / (1.0 + 4.0_f64.exp());
    assert!((output.probability - expected).abs() < 1e-12);
    assert!(!output.approved);
}

#[test]
fn threshold_is_read_from_artifact() {
    let model = LogisticClassifier::from_json(&artifact(CIBIL_ONLY, r#", "threshold": 0.95"#))
        .expect("artifact");
    let output = model
        .classify(&FeatureVector::from_application(&application()))
        .expect("classify");
    assert!(output.probability > 0.5 && output.probability < 0.95);
    assert!(!output.approved);
}

#[test]
fn wrong_length_is_a_shape_error() {
    let err = LogisticClassifier::from_json(&artifact("[1.0, 2.0]", "")).expect_err("shape");
    assert!(matches!(
        err,
        ClassifierError::Shape {
            field: "weights",
            actual: 2
        }
    ));
}

#[test]
fn zero_scale_is_rejected() {
    let raw = artifact(CIBIL_ONLY, "").replace("[1, 1, 1, 1, 1, 1, 100,", "[1, 1, 1, 0, 1, 1, 100,");
    let err = LogisticClassifier::from_json(&raw).expect_err("zero scale");
    assert!(matches!(err, ClassifierError::ZeroScale("income_annum")));
}

#[test]
fn malformed_and_missing_artifacts_fail() {
    assert!(matches!(
        LogisticClassifier::from_json("{not json"),
        Err(ClassifierError::Malformed(_))
    ));
    assert!(matches!(
        LogisticClassifier::from_path("/nonexistent/loan_classifier.json"),
        Err(ClassifierError::Io(_))
    ));
}

#[test]
fn unavailable_classifier_reports_reason() {
    let err = UnavailableClassifier::new("artifact missing")
        .classify(&FeatureVector::from_application(&application()))
        .expect_err("unavailable");
    assert_eq!(err.to_string(), "classifier unavailable: artifact missing");
}
