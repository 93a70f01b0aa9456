//! Adjustment rule models and parsing from user input.

use crate::decimal::Price;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the adjustment value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    /// Absolute currency amount.
    Fixed,

    /// Percentage of the base price.
    Dynamic,
}

impl AdjustmentType {
    /// Unit sign shown next to the value input.
    pub fn sign(&self) -> &'static str {
        match self {
            AdjustmentType::Fixed => "$",
            AdjustmentType::Dynamic => "%",
        }
    }
}

impl FromStr for AdjustmentType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(AdjustmentType::Fixed),
            "dynamic" => Ok(AdjustmentType::Dynamic),
            other => Err(EngineError::InvalidRule {
                message: format!("unknown adjustment type '{}'", other),
            }),
        }
    }
}

/// Direction of the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementType {
    Increase,
    Decrease,
}

impl FromStr for IncrementType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "increase" => Ok(IncrementType::Increase),
            "decrease" => Ok(IncrementType::Decrease),
            other => Err(EngineError::InvalidRule {
                message: format!("unknown increment type '{}'", other),
            }),
        }
    }
}

impl fmt::Display for IncrementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncrementType::Increase => write!(f, "Increase"),
            IncrementType::Decrease => write!(f, "Decrease"),
        }
    }
}

/// A price adjustment rule shared by every product it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAdjustmentRule {
    pub adjustment_type: AdjustmentType,

    /// Currency amount for `Fixed`, percentage (0-100) for `Dynamic`.
    pub adjustment_value: Price,

    pub increment_type: IncrementType,
}

impl PriceAdjustmentRule {
    pub fn new(
        adjustment_type: AdjustmentType,
        adjustment_value: Price,
        increment_type: IncrementType,
    ) -> Self {
        PriceAdjustmentRule {
            adjustment_type,
            adjustment_value,
            increment_type,
        }
    }

    /// Parses a rule from the three raw text fields a user enters.
    ///
    /// Only syntax is checked here; range checks belong to
    /// [`crate::pricing::validate`].
    pub fn parse(
        adjustment_type: &str,
        value: &str,
        increment_type: &str,
    ) -> Result<Self, EngineError> {
        let adjustment_type = AdjustmentType::from_str(adjustment_type)?;
        let increment_type = IncrementType::from_str(increment_type)?;
        let adjustment_value = Price::from_str(value).map_err(|_| EngineError::InvalidRule {
            message: format!("adjustment value '{}' is not a number", value.trim()),
        })?;

        Ok(PriceAdjustmentRule::new(
            adjustment_type,
            adjustment_value,
            increment_type,
        ))
    }
}

/// Formats an adjustment value for display: `"12.5%"` or `"$20.00"`.
pub fn format_adjustment_value(value: Price, adjustment_type: AdjustmentType) -> String {
    match adjustment_type {
        AdjustmentType::Dynamic => format!("{}%", value.value().normalize()),
        AdjustmentType::Fixed => format!("${}", value),
    }
}
