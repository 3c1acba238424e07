use crate::infra::{read_application, Services};
use chrono::Utc;
use clap::Args;
use loan_insight::accounts::{NotifierError, OtpNotifier, PendingVerification};
use loan_insight::config::AppConfig;
use loan_insight::error::AppError;
use loan_insight::predictions::{
    Education, FeatureVector, LoanApplication, LoanClassifier, LogisticClassifier,
    UnavailableClassifier, UserId, Verdict,
};
use loan_insight::reports::ExportFormat;
use loan_insight::scoring::{
    feature_importance, generate_recommendations, CreditHealthBreakdown, EligibilityRequest,
};
use serde_json::json;
use std::io::{Error as IoError, ErrorKind};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding one loan application
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Classifier artifact (defaults to LOAN_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Classifier artifact (defaults to LOAN_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Also export the prediction CSV, the workbook and the PDF report
    #[arg(long)]
    pub(crate) full_export: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let model_path = args.model.unwrap_or(config.classifier.model_path);
    let classifier = LogisticClassifier::from_path(&model_path)?;

    let application = read_application(&args.input)?;
    application
        .validate()
        .map_err(|err| IoError::new(ErrorKind::InvalidInput, err))?;

    let output = classifier.classify(&FeatureVector::from_application(&application))?;
    let verdict = if output.approved {
        Verdict::Approved
    } else {
        Verdict::Rejected
    };

    let report = json!({
        "verdict": verdict,
        "probability": (output.probability * 10_000.0).round() / 100.0,
        "credit_health": CreditHealthBreakdown::from_application(&application),
        "recommendations": generate_recommendations(&application, verdict),
        "feature_importance": feature_importance(&application),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Captures codes so the demo can complete its own verification step.
#[derive(Default)]
struct DemoNotifier {
    last_code: Mutex<Option<String>>,
}

impl DemoNotifier {
    fn take_code(&self) -> Option<String> {
        self.last_code
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
    }
}

impl OtpNotifier for DemoNotifier {
    fn deliver(&self, pending: &PendingVerification) -> Result<(), NotifierError> {
        let mut guard = self
            .last_code
            .lock()
            .map_err(|_| NotifierError::Transport("demo notifier poisoned".to_string()))?;
        *guard = Some(pending.code.clone());
        println!("  code sent to {}: {}", pending.email, pending.code);
        Ok(())
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let model_path = args.model.unwrap_or_else(|| config.classifier.model_path.clone());
    let notifier = Arc::new(DemoNotifier::default());

    println!("Loan insight demo");
    let loaded = LogisticClassifier::from_path(&model_path);
    let predictions_enabled = loaded.is_ok();
    let classifier: Arc<dyn LoanClassifier> = match loaded {
        Ok(model) => Arc::new(model),
        Err(err) => {
            println!(
                "  classifier unavailable at {} ({err}); predictions are skipped",
                model_path.display()
            );
            Arc::new(UnavailableClassifier::new(err.to_string()))
        }
    };
    let services = Services::build(&config, classifier, Arc::clone(&notifier));

    let now = Utc::now();
    println!("\nRegistration");
    let challenge = services
        .accounts
        .begin_registration("demo@example.com", "demo", "demo-password", now)
        .map_err(demo_error)?;
    let code = notifier
        .take_code()
        .ok_or_else(|| demo_error("no verification code delivered"))?;
    let user = services
        .accounts
        .complete_registration(&challenge.token, &code, now)
        .map_err(demo_error)?;
    println!("  registered {} as user {}", user.username, user.id.0);

    if predictions_enabled {
        println!("\nPredictions");
        for (label, application) in sample_applications() {
            let outcome = services
                .predictions
                .submit(user.id, application, Utc::now())
                .map_err(demo_error)?;
            println!(
                "  {label}: {} ({:.2}%)",
                outcome.record.verdict.label(),
                outcome.record.probability
            );
            if let Some(top) = outcome.feature_importance.first() {
                println!("    strongest factor: {} ({:.1}%)", top.name, top.percent);
            }
            for badge in &outcome.new_badges {
                println!("    badge earned: {} (+{} pts)", badge.name, badge.points);
            }
        }
    }

    print_insights(&services, user.id)?;

    println!("\nEligibility calculator");
    let check = services
        .insights
        .check_eligibility(
            user.id,
            &EligibilityRequest {
                income: 900_000.0,
                cibil: 710,
                loan_amount: 2_000_000.0,
            },
            Utc::now(),
        )
        .map_err(demo_error)?;
    println!(
        "  score {} / 100, eligible: {}, {}",
        check.report.score, check.report.eligible, check.report.recommendation
    );

    if predictions_enabled {
        let formats = if args.full_export {
            vec![
                ExportFormat::SummaryCsv,
                ExportFormat::PredictionsCsv,
                ExportFormat::Workbook,
                ExportFormat::PdfReport,
            ]
        } else {
            vec![ExportFormat::SummaryCsv]
        };
        for format in formats {
            let document = services
                .reports
                .export(user.id, format, Utc::now())
                .map_err(demo_error)?;
            println!("\nExport {}", document.filename);
            match format {
                ExportFormat::Workbook | ExportFormat::PdfReport => println!(
                    "  {} bytes of {}",
                    document.body.len(),
                    format.content_type()
                ),
                _ => print!("{}", String::from_utf8_lossy(&document.body)),
            }
            if let Some(badge) = document.new_badge {
                println!("  New badge: {}", badge.name);
            }
        }
    }

    let badges = services.insights.badges(user.id).map_err(demo_error)?;
    println!("\nBadges: {} points", badges.points);
    for earned in badges.badges {
        println!("  {} - {}", earned.badge.name, earned.badge.description);
    }

    Ok(())
}

fn print_insights<N>(services: &Services<N>, user_id: UserId) -> Result<(), AppError>
where
    N: OtpNotifier + 'static,
{
    let insights = services
        .insights
        .insights(user_id, Utc::now())
        .map_err(demo_error)?;

    println!("\nCredit health");
    println!("  score {} / 100", insights.credit_health_score);
    println!(
        "  readiness: {} ({})",
        insights.loan_readiness.level_label, insights.loan_readiness.score
    );
    for issue in insights.issues.iter().take(3) {
        println!("  {} {}", issue.icon, issue.issue);
    }
    if let Some(action) = insights.improvement_plan.first() {
        println!("  next step: {} ({})", action.action, action.timeline);
    }
    Ok(())
}

fn sample_applications() -> Vec<(&'static str, LoanApplication)> {
    vec![
        (
            "salaried graduate",
            LoanApplication {
                no_of_dependents: 1,
                education: Education::Graduate,
                self_employed: false,
                income_annum: 1_800_000.0,
                loan_amount: 3_500_000.0,
                loan_term: 120,
                cibil_score: 785,
                residential_assets_value: 4_200_000.0,
                commercial_assets_value: 1_000_000.0,
                luxury_assets_value: 600_000.0,
                bank_asset_value: 800_000.0,
            },
        ),
        (
            "self-employed applicant",
            LoanApplication {
                no_of_dependents: 3,
                education: Education::NotGraduate,
                self_employed: true,
                income_annum: 900_000.0,
                loan_amount: 4_000_000.0,
                loan_term: 180,
                cibil_score: 640,
                residential_assets_value: 1_200_000.0,
                commercial_assets_value: 300_000.0,
                luxury_assets_value: 200_000.0,
                bank_asset_value: 150_000.0,
            },
        ),
        (
            "thin credit file",
            LoanApplication {
                no_of_dependents: 2,
                education: Education::Graduate,
                self_employed: false,
                income_annum: 600_000.0,
                loan_amount: 2_500_000.0,
                loan_term: 240,
                cibil_score: 520,
                residential_assets_value: 300_000.0,
                commercial_assets_value: 0.0,
                luxury_assets_value: 100_000.0,
                bank_asset_value: 50_000.0,
            },
        ),
    ]
}

fn demo_error(err: impl std::fmt::Display) -> AppError {
    AppError::Io(IoError::new(ErrorKind::Other, err.to_string()))
}
