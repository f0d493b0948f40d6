//! Fraud Risk Demo - Main Entry Point
//!
//! Reads one transaction form submission, derives its features, scores it
//! and prints the fraud probability with its risk tier.
//!
//! Usage: `fraud-risk-demo [SUBMISSION] [CONFIG]`
//!
//! `SUBMISSION` is a JSON file, `-` for stdin, or omitted to submit the form
//! defaults. `CONFIG` defaults to `config/config.toml`.

use anyhow::Result;
use fraud_risk_demo::{
    config::{AppConfig, LogFormat, LoggingConfig, DEFAULT_CONFIG_PATH},
    feature_builder::FeatureBuilder,
    models::scorer::RiskScorer,
    read_submission, render,
};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let submission_arg = args.get(1).map(|s| s.as_str());
    let config_path = args.get(2).map(|s| s.as_str()).unwrap_or(DEFAULT_CONFIG_PATH);

    let config = AppConfig::load_from_path(config_path)?;
    init_logging(&config.logging)?;

    info!(path = %config_path, "Starting Fraud Risk Demo");
    info!(
        "Risk tiers: moderate>={:.2}, high>={:.2}",
        config.detection.risk_tiers.moderate, config.detection.risk_tiers.high
    );

    let builder = FeatureBuilder::with_defaults(config.features.clone());
    info!(
        "Feature builder initialized ({} features)",
        builder.feature_count()
    );

    // Loaded once; a failure leaves the process in fallback mode.
    let scorer = RiskScorer::from_config(&config);
    if let Some(name) = scorer.model_name() {
        eprintln!("{}", render::model_loaded_notice(name));
    } else if let Some(reason) = scorer.load_error() {
        eprintln!("{}", render::model_unavailable_notice(reason));
    }

    let form = read_submission(submission_arg, std::io::stdin().lock())?;
    let assessment = fraud_risk_demo::submit(&form, &builder, &scorer)?;

    info!(
        assessment_id = %assessment.assessment_id,
        probability = assessment.probability,
        tier = ?assessment.tier,
        source = %assessment.source,
        "Submission scored"
    );

    println!("{}", render::render(&assessment, config.display.format)?);
    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("fraud_risk_demo={}", logging.level).parse()?);

    // Logs go to stderr so stdout carries only the rendered assessment.
    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}
