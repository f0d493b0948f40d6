use fraud_risk_demo::models::classifier::FraudClassifier;
use fraud_risk_demo::types::assessment::{RiskTierThresholds, ScoreSource};
use fraud_risk_demo::types::submission::MerchantCategory;
use fraud_risk_demo::{
    read_submission, submit, FeatureBuilder, RiskScorer, RiskTier, TransactionFeatureRecord,
    TransactionForm, STDIN_SOURCE,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn moderate_risk_for_daytime_overspend() {
    let assessment = fallback_submit(form(75.0, 50.0, 14));

    assert!((assessment.probability - 0.2).abs() < 1e-9);
    assert_eq!(assessment.tier, RiskTier::Moderate);
    assert_eq!(assessment.source, ScoreSource::Fallback);
}

#[test]
fn moderate_risk_for_late_night_typical_amount() {
    let assessment = fallback_submit(form(50.0, 50.0, 23));

    assert!((assessment.probability - 0.25).abs() < 1e-9);
    assert_eq!(assessment.tier, RiskTier::Moderate);
}

#[test]
fn high_risk_clamped_for_large_night_purchase() {
    let assessment = fallback_submit(form(500.0, 50.0, 2));

    assert!((assessment.amount_deviation_ratio - 10.0).abs() < 1e-9);
    assert_eq!(assessment.probability, 1.0);
    assert_eq!(assessment.tier, RiskTier::High);
}

#[test]
fn extreme_deviation_clamps_to_one() {
    let assessment = fallback_submit(form(100_000.0, 1.0, 14));
    assert_eq!(assessment.probability, 1.0);
}

#[test]
fn low_risk_below_typical_amount() {
    let assessment = fallback_submit(form(10.0, 50.0, 12));

    assert_eq!(assessment.probability, 0.0);
    assert_eq!(assessment.tier, RiskTier::Low);
}

#[test]
fn invalid_form_is_rejected_before_scoring() {
    let classifier = CountingClassifier::new(0.5);
    let calls = classifier.calls.clone();
    let scorer = RiskScorer::new(Some(Box::new(classifier)), RiskTierThresholds::default());

    let mut bad = form(75.0, 50.0, 14);
    bad.hours_since_last = 200.0;

    let err = submit(&bad, &FeatureBuilder::new(), &scorer).unwrap_err();
    assert!(format!("{:#}", err).contains("hours_since_last"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn classifier_invoked_once_per_submission() {
    let classifier = CountingClassifier::new(0.07);
    let calls = classifier.calls.clone();
    let seen_category = classifier.seen_category.clone();
    let scorer = RiskScorer::new(Some(Box::new(classifier)), RiskTierThresholds::default());

    let mut submission = form(500.0, 50.0, 2);
    submission.merchant_category = MerchantCategory::ShoppingNet;
    let assessment = submit(&submission, &FeatureBuilder::new(), &scorer).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        seen_category.load(Ordering::SeqCst),
        MerchantCategory::ShoppingNet.code() as usize
    );
    assert_eq!(assessment.probability, 0.07);
    assert_eq!(assessment.tier, RiskTier::Low);
    assert_eq!(
        assessment.source,
        ScoreSource::Model {
            name: "counting".to_string()
        }
    );
}

#[test]
fn submission_defaults_when_no_source_given() {
    let form = read_submission(None, std::io::empty()).unwrap();
    assert_eq!(form, TransactionForm::default());

    let assessment = fallback_submit(form);
    assert_eq!(assessment.tier, RiskTier::Moderate);
}

#[test]
fn submission_read_from_stdin_source() {
    let stdin = br#"{"amt": 500.0, "typical_amt": 50.0, "trans_hour": 2}"#;
    let form = read_submission(Some(STDIN_SOURCE), &stdin[..]).unwrap();

    assert_eq!(form.amount, 500.0);
    assert_eq!(fallback_submit(form).tier, RiskTier::High);
}

#[test]
fn submission_read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("submission.json");
    std::fs::write(
        &path,
        r#"{"amount": 50.0, "typical_amount": 50.0, "transaction_hour": 23}"#,
    )
    .unwrap();

    // stdin is ignored for file sources
    let stdin = br#"{"amount": 1.0}"#;
    let form = read_submission(path.to_str(), &stdin[..]).unwrap();

    let assessment = fallback_submit(form);
    assert!((assessment.probability - 0.25).abs() < 1e-9);
}

#[test]
fn unreadable_submission_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(read_submission(missing.to_str(), std::io::empty()).is_err());

    let err = read_submission(Some(STDIN_SOURCE), &b"[1, 2]"[..]).unwrap_err();
    assert!(err.to_string().contains("parse transaction form"));
}

fn fallback_submit(form: TransactionForm) -> fraud_risk_demo::RiskAssessment {
    let scorer = RiskScorer::fallback_only(RiskTierThresholds::default());
    submit(&form, &FeatureBuilder::new(), &scorer).unwrap()
}

fn form(amount: f64, typical_amount: f64, hour: u8) -> TransactionForm {
    TransactionForm {
        amount,
        typical_amount,
        transaction_hour: hour,
        ..TransactionForm::default()
    }
}

struct CountingClassifier {
    probability: f64,
    calls: Arc<AtomicUsize>,
    seen_category: Arc<AtomicUsize>,
}

impl CountingClassifier {
    fn new(probability: f64) -> Self {
        Self {
            probability,
            calls: Arc::new(AtomicUsize::new(0)),
            seen_category: Arc::new(AtomicUsize::new(usize::MAX)),
        }
    }
}

impl FraudClassifier for CountingClassifier {
    fn name(&self) -> &str {
        "counting"
    }

    fn predict_probability(&self, record: &TransactionFeatureRecord) -> anyhow::Result<[f64; 2]> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_category
            .store(record.category.code() as usize, Ordering::SeqCst);
        Ok([1.0 - self.probability, self.probability])
    }
}
