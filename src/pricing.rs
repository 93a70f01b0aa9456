//! Price adjustment calculation.
//!
//! Pure functions: validation, single-item computation and batch computation.
//! Nothing here performs I/O or keeps state between calls.

use crate::decimal::Price;
use crate::error::ValidationError;
use crate::rule::{AdjustmentType, IncrementType, PriceAdjustmentRule};
use serde::Serialize;

/// Error text for batch items without a usable base price.
pub const INVALID_PRODUCT_PRICE: &str = "Invalid product price";

/// A single price computation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceComputationInput {
    pub base_price: Price,
    pub rule: PriceAdjustmentRule,
}

impl PriceComputationInput {
    pub fn new(base_price: Price, rule: PriceAdjustmentRule) -> Self {
        PriceComputationInput { base_price, rule }
    }
}

/// Outcome of a successful single-item computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceComputationResult {
    pub base_price: Price,

    /// Rounded to cents, never negative.
    pub new_price: Price,

    /// `new_price - base_price`.
    pub adjustment: Price,
}

/// A product handed to [`compute_batch`]. The price may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchItem {
    pub id: u32,
    pub base_price: Option<Price>,
}

impl BatchItem {
    pub fn new(id: u32, base_price: Option<Price>) -> Self {
        BatchItem { id, base_price }
    }
}

/// Per-item batch outcome. `error` is set when the item could not be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub id: u32,
    pub base_price: Price,
    pub new_price: Price,
    pub adjustment: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Validates a computation request.
///
/// Checks run in a fixed order and stop at the first failure, so callers
/// rendering inline form errors always see the same message for the same
/// input. Zero adjustment values pass here; [`compute_single_price`] rejects
/// them.
pub fn validate(input: &PriceComputationInput) -> Result<(), ValidationError> {
    let base_price = input.base_price;
    let rule = &input.rule;
    let value = rule.adjustment_value;

    if base_price.is_negative() {
        return Err(ValidationError::InvalidBasePrice);
    }

    validate_rule(rule)?;

    if rule.increment_type == IncrementType::Decrease {
        match rule.adjustment_type {
            AdjustmentType::Fixed if value > base_price => {
                return Err(ValidationError::FixedDecreaseExceedsBase);
            }
            AdjustmentType::Dynamic if value > Price::HUNDRED => {
                return Err(ValidationError::PercentageDecreaseOutOfRange);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Checks the parts of a rule that don't depend on a product's price.
pub fn validate_rule(rule: &PriceAdjustmentRule) -> Result<(), ValidationError> {
    let value = rule.adjustment_value;

    if value.is_negative() {
        return Err(ValidationError::InvalidAdjustmentValue);
    }

    if rule.adjustment_type == AdjustmentType::Dynamic && value > Price::HUNDRED {
        return Err(ValidationError::PercentageOutOfRange);
    }

    Ok(())
}

/// Computes the adjusted price for one product.
///
/// # Formulas
///
/// - fixed + increase: `base + value`
/// - fixed + decrease: `max(0, base - value)`
/// - dynamic + increase: `base + value% * base`
/// - dynamic + decrease: `max(0, base - value% * base)`
///
/// The result is rounded to cents (ties away from zero) and floored at zero.
pub fn compute_single_price(
    input: &PriceComputationInput,
) -> Result<PriceComputationResult, ValidationError> {
    validate(input)?;

    let base_price = input.base_price;
    let rule = &input.rule;

    if rule.adjustment_value.is_zero() {
        return Err(ValidationError::InvalidAdjustmentValue);
    }

    let amount = match rule.adjustment_type {
        AdjustmentType::Fixed => Some(rule.adjustment_value),
        AdjustmentType::Dynamic => base_price.checked_percent_of(rule.adjustment_value),
    }
    .ok_or(ValidationError::PriceOutOfRange)?;

    let raw = match rule.increment_type {
        IncrementType::Increase => base_price.checked_add(amount),
        IncrementType::Decrease => base_price.checked_sub(amount).map(|p| p.clamp_non_negative()),
    }
    .ok_or(ValidationError::PriceOutOfRange)?;

    let new_price = raw.round_to_cents().clamp_non_negative();
    let adjustment = new_price
        .checked_sub(base_price)
        .ok_or(ValidationError::PriceOutOfRange)?;

    Ok(PriceComputationResult {
        base_price,
        new_price,
        adjustment,
    })
}

/// Applies one rule to many products.
///
/// Never fails as a whole: returns exactly one result per input item, in
/// input order. Items without a positive price get [`INVALID_PRODUCT_PRICE`];
/// items the rule rejects keep their base price unchanged and carry the
/// validation message.
pub fn compute_batch(items: &[BatchItem], rule: &PriceAdjustmentRule) -> Vec<BatchResult> {
    items.iter().map(|item| compute_item(item, rule)).collect()
}

fn compute_item(item: &BatchItem, rule: &PriceAdjustmentRule) -> BatchResult {
    let base_price = match item.base_price {
        Some(price) if !price.is_zero() && !price.is_negative() => price,
        _ => {
            return BatchResult {
                id: item.id,
                base_price: Price::ZERO,
                new_price: Price::ZERO,
                adjustment: Price::ZERO,
                error: Some(INVALID_PRODUCT_PRICE.to_string()),
            };
        }
    };

    match compute_single_price(&PriceComputationInput::new(base_price, *rule)) {
        Ok(result) => BatchResult {
            id: item.id,
            base_price: result.base_price,
            new_price: result.new_price,
            adjustment: result.adjustment,
            error: None,
        },
        Err(e) => BatchResult {
            id: item.id,
            base_price,
            new_price: base_price,
            adjustment: Price::ZERO,
            error: Some(e.to_string()),
        },
    }
}
