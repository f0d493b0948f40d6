//! Feature derivation for fraud classifier inference.
//!
//! Turns the raw form attributes into the serving-schema record the
//! classifier was trained on, plus the side values only the fallback
//! heuristic consumes.

use crate::config::FeatureDefaults;
use crate::types::record::{TransactionFeatureRecord, FEATURE_COUNT, FEATURE_NAMES};
use crate::types::submission::TransactionForm;

/// Output of the feature builder for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    /// Record passed to the classifier
    pub record: TransactionFeatureRecord,
    /// `amount / typical_amount`, or 1.0 when the typical amount is zero.
    /// Never passed to the classifier.
    pub amount_deviation_ratio: f64,
}

/// Builds feature records from form submissions.
pub struct FeatureBuilder {
    defaults: FeatureDefaults,
}

impl FeatureBuilder {
    /// Create a builder using the built-in default table.
    pub fn new() -> Self {
        Self::with_defaults(FeatureDefaults::default())
    }

    /// Create a builder with a custom default table.
    pub fn with_defaults(defaults: FeatureDefaults) -> Self {
        Self { defaults }
    }

    /// Derive the feature set for a validated form.
    pub fn build(&self, form: &TransactionForm) -> FeatureSet {
        let d = &self.defaults;
        let hour = form.transaction_hour;

        let record = TransactionFeatureRecord {
            category: form.merchant_category,
            amount: form.amount,
            log_amount: log_amount(form.amount),
            transaction_hour: hour,
            is_late_night: is_late_night(hour),
            transaction_month: d.transaction_month,
            is_holiday_season: d.is_holiday_season,
            distance_km: form.distance_from_usual,
            time_since_last_transaction: form.hours_since_last,
            count_30_days: d.count_30_days,
            count_7_days: d.count_7_days,
            count_1_day: d.count_1_day,
            gender: d.gender,
            lat: d.home_lat,
            long: d.home_long,
            merchant_lat: d.merchant_lat,
            merchant_long: d.merchant_long,
            day_of_week: d.day_of_week,
            is_night: is_night(hour),
            usual_lat: d.usual_lat,
            usual_long: d.usual_long,
            distance_from_usual_km: form.distance_from_usual,
            city_population: d.city_population,
        };

        FeatureSet {
            record,
            amount_deviation_ratio: amount_deviation_ratio(form.amount, form.typical_amount),
        }
    }

    /// Get the number of columns in a record.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get column names in model input order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `ln(1 + amount)`
pub fn log_amount(amount: f64) -> f64 {
    amount.ln_1p()
}

/// 1 for hours 22..=23 and 0..=5.
pub fn is_late_night(hour: u8) -> u8 {
    u8::from(hour >= 22 || hour <= 5)
}

/// 1 for hours 21..=23 and 0..=5. Kept separate from [`is_late_night`]:
/// the classifier expects both columns.
pub fn is_night(hour: u8) -> u8 {
    u8::from(hour >= 21 || hour <= 5)
}

/// Amount relative to the typical amount; 1.0 ("no deviation") when the
/// typical amount is zero.
pub fn amount_deviation_ratio(amount: f64, typical_amount: f64) -> f64 {
    if typical_amount > 0.0 {
        amount / typical_amount
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::Gender;
    use crate::types::submission::MerchantCategory;

    #[test]
    fn test_feature_build() {
        let builder = FeatureBuilder::new();
        let form = TransactionForm {
            amount: 75.0,
            transaction_hour: 14,
            merchant_category: MerchantCategory::Travel,
            typical_amount: 50.0,
            typical_hour: 18,
            distance_from_usual: 42.0,
            hours_since_last: 3.0,
        };

        let features = builder.build(&form);
        let record = &features.record;

        assert_eq!(record.category, MerchantCategory::Travel);
        assert_eq!(record.amount, 75.0);
        assert!((record.log_amount - 76.0_f64.ln()).abs() < 1e-12);
        assert_eq!(record.transaction_hour, 14);
        assert_eq!(record.is_late_night, 0);
        assert_eq!(record.is_night, 0);
        assert_eq!(record.distance_km, 42.0);
        assert_eq!(record.distance_from_usual_km, 42.0);
        assert_eq!(record.time_since_last_transaction, 3.0);
        assert!((features.amount_deviation_ratio - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_defaults_fill_unmodeled_columns() {
        let builder = FeatureBuilder::new();
        let record = builder.build(&TransactionForm::default()).record;

        assert_eq!(record.transaction_month, 6);
        assert_eq!(record.is_holiday_season, 0);
        assert_eq!(record.count_30_days, 2.0);
        assert_eq!(record.count_7_days, 1.0);
        assert_eq!(record.count_1_day, 0.0);
        assert_eq!(record.gender, Gender::M);
        assert_eq!((record.lat, record.long), (43.65, -79.38));
        assert_eq!((record.merchant_lat, record.merchant_long), (43.70, -79.40));
        assert_eq!((record.usual_lat, record.usual_long), (43.65, -79.38));
        assert_eq!(record.day_of_week, 3);
        assert_eq!(record.city_population, 1_000_000);
    }

    #[test]
    fn test_defaults_independent_of_input() {
        let builder = FeatureBuilder::new();
        let a = builder.build(&TransactionForm::default()).record;
        let b = builder
            .build(&TransactionForm {
                amount: 9000.0,
                transaction_hour: 2,
                merchant_category: MerchantCategory::MiscNet,
                typical_amount: 0.0,
                typical_hour: 0,
                distance_from_usual: 480.0,
                hours_since_last: 160.0,
            })
            .record;

        assert_eq!(a.transaction_month, b.transaction_month);
        assert_eq!(a.count_30_days, b.count_30_days);
        assert_eq!(a.gender, b.gender);
        assert_eq!(a.city_population, b.city_population);
        assert_eq!(a.merchant_long, b.merchant_long);
    }

    #[test]
    fn test_custom_default_table() {
        let defaults = FeatureDefaults {
            transaction_month: 12,
            is_holiday_season: 1,
            ..FeatureDefaults::default()
        };
        let builder = FeatureBuilder::with_defaults(defaults);
        let record = builder.build(&TransactionForm::default()).record;

        assert_eq!(record.transaction_month, 12);
        assert_eq!(record.is_holiday_season, 1);
    }

    #[test]
    fn test_log_amount_non_negative_and_monotonic() {
        let amounts = [0.0, 0.01, 1.0, 75.0, 1_000.0, 100_000.0, 1e12];
        assert_eq!(log_amount(0.0), 0.0);
        for pair in amounts.windows(2) {
            assert!(log_amount(pair[0]) >= 0.0);
            assert!(log_amount(pair[1]) > log_amount(pair[0]));
        }
    }

    #[test]
    fn test_night_flags() {
        let late_night: Vec<u8> = (0..24).filter(|&h| is_late_night(h) == 1).collect();
        let night: Vec<u8> = (0..24).filter(|&h| is_night(h) == 1).collect();

        assert_eq!(late_night, vec![0, 1, 2, 3, 4, 5, 22, 23]);
        assert_eq!(night, vec![0, 1, 2, 3, 4, 5, 21, 22, 23]);

        for hour in 0..24 {
            if is_late_night(hour) == 1 {
                assert_eq!(is_night(hour), 1, "hour {}", hour);
            }
        }

        assert_eq!(is_night(21), 1);
        assert_eq!(is_late_night(21), 0);
        assert_eq!(is_night(6), 0);
        assert_eq!(is_night(20), 0);
    }

    #[test]
    fn test_deviation_ratio_zero_typical() {
        assert_eq!(amount_deviation_ratio(75.0, 0.0), 1.0);
        assert_eq!(amount_deviation_ratio(0.0, 0.0), 1.0);
        assert_eq!(amount_deviation_ratio(0.0, 50.0), 0.0);
        assert_eq!(amount_deviation_ratio(100_000.0, 1.0), 100_000.0);
    }

    #[test]
    fn test_vector_matches_names() {
        let builder = FeatureBuilder::new();
        let features = builder.build(&TransactionForm::default());
        let vector = features.record.to_vector();

        assert_eq!(vector.len(), builder.feature_count());
        assert_eq!(builder.feature_names().len(), builder.feature_count());
        assert_eq!(builder.feature_names()[1], "amt");
        assert_eq!(vector[1], 75.0);
        assert_eq!(builder.feature_names()[12], "gender");
        assert_eq!(vector[12], 1.0);
        assert_eq!(builder.feature_names()[22], "city_pop");
        assert_eq!(vector[22], 1_000_000.0);
    }
}
