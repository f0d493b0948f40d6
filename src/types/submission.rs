//! Transaction form submitted by the user

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Upper bound accepted for the distance from usual locations (km)
pub const MAX_DISTANCE_KM: f64 = 500.0;

/// Upper bound accepted for the hours since the previous transaction (one week)
pub const MAX_HOURS_SINCE_LAST: f64 = 168.0;

/// Merchant category offered by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MerchantCategory {
    #[default]
    GroceryPos,
    GasTransport,
    ShoppingNet,
    MiscNet,
    FoodDining,
    Home,
    Travel,
    GroceryNet,
    ShoppingPos,
    Other,
}

impl MerchantCategory {
    /// All categories in the order the classifier was trained with
    pub const ALL: [MerchantCategory; 10] = [
        MerchantCategory::GroceryPos,
        MerchantCategory::GasTransport,
        MerchantCategory::ShoppingNet,
        MerchantCategory::MiscNet,
        MerchantCategory::FoodDining,
        MerchantCategory::Home,
        MerchantCategory::Travel,
        MerchantCategory::GroceryNet,
        MerchantCategory::ShoppingPos,
        MerchantCategory::Other,
    ];

    /// Ordinal code used when the category is fed to the model
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MerchantCategory::GroceryPos => "grocery_pos",
            MerchantCategory::GasTransport => "gas_transport",
            MerchantCategory::ShoppingNet => "shopping_net",
            MerchantCategory::MiscNet => "misc_net",
            MerchantCategory::FoodDining => "food_dining",
            MerchantCategory::Home => "home",
            MerchantCategory::Travel => "travel",
            MerchantCategory::GroceryNet => "grocery_net",
            MerchantCategory::ShoppingPos => "shopping_pos",
            MerchantCategory::Other => "other",
        }
    }
}

impl fmt::Display for MerchantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected form input
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Raw attributes collected by the transaction form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionForm {
    /// Transaction amount ($)
    #[serde(alias = "amt")]
    pub amount: f64,

    /// Hour of day the transaction happened (0-23)
    #[serde(alias = "trans_hour")]
    pub transaction_hour: u8,

    #[serde(alias = "category")]
    pub merchant_category: MerchantCategory,

    /// The customer's typical transaction amount ($)
    #[serde(alias = "typical_amt")]
    pub typical_amount: f64,

    /// The customer's typical transaction hour (0-23)
    pub typical_hour: u8,

    /// Distance from the customer's usual locations (km)
    pub distance_from_usual: f64,

    /// Hours since the customer's previous transaction
    #[serde(alias = "time_since_last")]
    pub hours_since_last: f64,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            amount: 75.0,
            transaction_hour: 14,
            merchant_category: MerchantCategory::GroceryPos,
            typical_amount: 50.0,
            typical_hour: 18,
            distance_from_usual: 10.0,
            hours_since_last: 12.0,
        }
    }
}

impl TransactionForm {
    /// Parse a JSON submission. Missing fields take the form defaults.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("Failed to parse transaction form")
    }

    /// Parse a JSON submission file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to read submission from {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Check every field against the ranges the form allows.
    pub fn validate(&self) -> Result<(), FormError> {
        check_range("amount", self.amount, 0.0, f64::MAX)?;
        check_range("typical_amount", self.typical_amount, 0.0, f64::MAX)?;
        check_range("transaction_hour", self.transaction_hour as f64, 0.0, 23.0)?;
        check_range("typical_hour", self.typical_hour as f64, 0.0, 23.0)?;
        check_range(
            "distance_from_usual",
            self.distance_from_usual,
            0.0,
            MAX_DISTANCE_KM,
        )?;
        check_range(
            "hours_since_last",
            self.hours_since_last,
            0.0,
            MAX_HOURS_SINCE_LAST,
        )?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), FormError> {
    if !value.is_finite() {
        return Err(FormError::NotFinite { field, value });
    }
    if value < min || value > max {
        return Err(FormError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
