//! Pricing profile form validation.
//!
//! A profile bundles a name, an adjustment rule and the products it applies
//! to. Fields arrive as raw text, so this module checks each of them and
//! reports every problem at once instead of stopping at the first.

use crate::decimal::Price;
use crate::preview::PricingTableItem;
use crate::rule::{AdjustmentType, PriceAdjustmentRule};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const MIN_NAME_LEN: usize = 3;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PRODUCTS: usize = 1000;

/// Largest fixed adjustment a profile may carry, in currency units.
pub const MAX_FIXED_ADJUSTMENT: u32 = 1_000_000;

fn max_fixed_adjustment() -> Price {
    Price::new(Decimal::from(MAX_FIXED_ADJUSTMENT))
}

/// Form field names used as error keys.
pub mod field {
    pub const NAME: &str = "name";
    pub const ADJUSTMENT_TYPE: &str = "adjustmentType";
    pub const ADJUSTMENT_VALUE: &str = "adjustmentValue";
    pub const INCREMENT_TYPE: &str = "incrementType";
    pub const PRODUCT_IDS: &str = "productIds";
}

/// Profile form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingProfileForm {
    pub name: String,
    pub adjustment_type: String,
    pub adjustment_value: String,
    pub increment_type: String,
    pub product_ids: Vec<u32>,
}

/// Field errors keyed by field name. Empty when the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub errors: BTreeMap<&'static str, String>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Error text for one field, if any.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    fn push(&mut self, field: &'static str, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

impl PricingProfileForm {
    /// Checks every field and collects all errors.
    pub fn validate(&self) -> FormValidation {
        let mut result = FormValidation::default();

        let name = self.name.trim();
        if name.is_empty() {
            result.push(field::NAME, "Profile name is required");
        } else if name.chars().count() < MIN_NAME_LEN {
            result.push(field::NAME, "Profile name must be at least 3 characters");
        } else if name.chars().count() > MAX_NAME_LEN {
            result.push(field::NAME, "Profile name must be less than 100 characters");
        }

        let adjustment_type = match self.adjustment_type.as_str() {
            "fixed" => Some(AdjustmentType::Fixed),
            "dynamic" => Some(AdjustmentType::Dynamic),
            _ => None,
        };
        if adjustment_type.is_none() {
            result.push(
                field::ADJUSTMENT_TYPE,
                "Adjustment type must be 'fixed' or 'dynamic'",
            );
        }

        match Price::from_str(&self.adjustment_value) {
            Err(_) => result.push(
                field::ADJUSTMENT_VALUE,
                "Adjustment value must be a valid number",
            ),
            Ok(value) if value.is_zero() || value.is_negative() => result.push(
                field::ADJUSTMENT_VALUE,
                "Adjustment value must be greater than 0",
            ),
            Ok(value) => match adjustment_type {
                Some(AdjustmentType::Dynamic) if value > Price::HUNDRED => result.push(
                    field::ADJUSTMENT_VALUE,
                    "Percentage adjustment cannot exceed 100%",
                ),
                Some(AdjustmentType::Fixed) if value > max_fixed_adjustment() => result.push(
                    field::ADJUSTMENT_VALUE,
                    "Fixed adjustment cannot exceed $1,000,000",
                ),
                _ => {}
            },
        }

        if !matches!(self.increment_type.as_str(), "increase" | "decrease") {
            result.push(
                field::INCREMENT_TYPE,
                "Increment type must be 'increase' or 'decrease'",
            );
        }

        if self.product_ids.is_empty() {
            result.push(field::PRODUCT_IDS, "At least one product must be selected");
        } else if self.product_ids.len() > MAX_PRODUCTS {
            result.push(
                field::PRODUCT_IDS,
                "Cannot select more than 1000 products at once",
            );
        }

        result
    }

    /// Returns the typed rule, or the field errors if the form is invalid.
    pub fn to_rule(&self) -> Result<PriceAdjustmentRule, FormValidation> {
        let validation = self.validate();
        if !validation.is_valid() {
            return Err(validation);
        }

        PriceAdjustmentRule::parse(
            &self.adjustment_type,
            &self.adjustment_value,
            &self.increment_type,
        )
        .map_err(|e| {
            let mut validation = FormValidation::default();
            validation.errors.insert(field::ADJUSTMENT_VALUE, e.to_string());
            validation
        })
    }
}

/// A named rule with the preview rows it produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingProfile {
    pub name: String,
    #[serde(flatten)]
    pub rule: PriceAdjustmentRule,
    pub product_ids: Vec<u32>,
    pub pricing_table: Vec<PricingTableItem>,
}
