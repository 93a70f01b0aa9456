//! Pricing Preview CLI
//!
//! Loads a product catalog from CSV, applies an adjustment rule to the
//! selected products and prints the preview table as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- catalog.csv dynamic 15 increase 1 2 3 > preview.csv
//! ```
//!
//! With no product ids every catalog product is priced.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use log::{info, warn};
use pricing_engine::{
    validate_rule, write_csv, Catalog, EngineError, PriceAdjustmentRule, PricingPreview,
    PricingScope, ProductSelection, Result,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 5 {
        return Err(EngineError::MissingArgument);
    }

    let rule = PriceAdjustmentRule::parse(&args[2], &args[3], &args[4])?;

    validate_rule(&rule)?;

    let ids = args[5..]
        .iter()
        .map(|s| {
            s.trim().parse::<u32>().map_err(|_| EngineError::InvalidRule {
                message: format!("product id '{}' is not a number", s),
            })
        })
        .collect::<Result<Vec<u32>>>()?;

    let file = File::open(&args[1])?;
    let catalog = Catalog::load_csv(BufReader::new(file))?;

    let selection = if ids.is_empty() {
        let mut selection = ProductSelection::default();
        selection.set_scope(PricingScope::All, &catalog.ids());
        selection
    } else {
        let mut selection = ProductSelection::new(PricingScope::Multiple);
        selection.select_all(&ids);
        selection
    };

    if selection.is_empty() {
        warn!("No products selected");
    }
    info!(
        "Pricing {} products ({:?} scope)",
        selection.len(),
        selection.scope()
    );

    let mut preview = PricingPreview::new(catalog);
    let rows = preview.generate(selection.selected_ids(), &rule);
    if rows.is_empty() {
        warn!("Preview is empty");
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    write_csv(&rows, handle)?;

    Ok(())
}
