//! # Pricing Engine
//!
//! Computes adjusted wholesale prices for pricing profiles: a fixed amount or
//! a percentage, increasing or decreasing, applied to one product or a batch.
//!
//! ## Design Principles
//!
//! - **Decimal arithmetic**: Prices use `rust_decimal`, rounded to cents half away from zero
//! - **Pure core**: Validation and computation have no I/O and no hidden state
//! - **Isolated failures**: A batch always returns one result per product
//! - **Never negative**: Decreases are floored at zero
//!
//! ## Example
//!
//! ```
//! use pricing_engine::{compute_single_price, PriceAdjustmentRule, PriceComputationInput, Price};
//! use std::str::FromStr;
//!
//! let rule = PriceAdjustmentRule::parse("dynamic", "15", "increase").unwrap();
//! let input = PriceComputationInput::new(Price::from_str("19.99").unwrap(), rule);
//! let result = compute_single_price(&input).unwrap();
//! assert_eq!(result.new_price.to_string(), "22.99");
//! ```

pub mod catalog;
pub mod decimal;
pub mod error;
pub mod preview;
pub mod pricing;
pub mod profile;
pub mod rule;
pub mod selection;

pub use catalog::{Catalog, Product, ProductFilters};
pub use decimal::Price;
pub use error::{EngineError, Result, ValidationError};
pub use preview::{write_csv, PricingPreview, PricingTableItem};
pub use pricing::{
    compute_batch, compute_single_price, validate, validate_rule, BatchItem, BatchResult,
    PriceComputationInput, PriceComputationResult, INVALID_PRODUCT_PRICE,
};
pub use profile::{FormValidation, PricingProfile, PricingProfileForm};
pub use rule::{format_adjustment_value, AdjustmentType, IncrementType, PriceAdjustmentRule};
pub use selection::{PricingScope, ProductSelection, SelectionError};
