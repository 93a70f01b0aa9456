//! Error types for the pricing engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Reasons a price computation request is rejected.
///
/// The `Display` text is the message shown to users next to the offending
/// form field, so it must stay stable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Base price is negative or not a finite number
    #[error("Base price must be a valid positive number")]
    InvalidBasePrice,

    /// Adjustment value is negative, not a finite number, or zero at compute time
    #[error("Adjustment value must be a valid positive number")]
    InvalidAdjustmentValue,

    /// Percentage adjustment above 100, either direction
    #[error("Percentage adjustment cannot exceed 100%")]
    PercentageOutOfRange,

    /// Percentage decrease above 100
    #[error("Percentage decrease cannot exceed 100%")]
    PercentageDecreaseOutOfRange,

    /// Fixed decrease larger than the base price
    #[error("Fixed decrease amount cannot exceed base price")]
    FixedDecreaseExceedsBase,

    /// Adjusted price is too large to represent
    #[error("Adjusted price is out of range")]
    PriceOutOfRange,
}

/// Errors that can occur while loading catalogs or producing previews.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Adjustment rule could not be parsed from user input
    #[error("Invalid pricing rule: {message}")]
    InvalidRule { message: String },

    /// Price computation rejected the request
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing command line arguments
    #[error(
        "Missing arguments. Usage: pricing-engine <catalog.csv> <fixed|dynamic> <value> <increase|decrease> [product-id ...]"
    )]
    MissingArgument,
}
