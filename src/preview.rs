//! Pricing table preview.
//!
//! Applies an adjustment rule to the selected catalog products and renders
//! the rows shown before a profile is saved. Results are memoized per
//! `(rule, selection)` so repeated requests with unchanged inputs skip the
//! batch computation.

use crate::catalog::{Catalog, Product};
use crate::decimal::Price;
use crate::error::Result;
use crate::pricing::{compute_batch, BatchItem, BatchResult};
use crate::profile::{FormValidation, PricingProfile, PricingProfileForm};
use crate::rule::PriceAdjustmentRule;
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// One row of the preview table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTableItem {
    pub id: u32,
    pub title: String,
    pub sku: String,
    pub category: String,
    pub wholesale_price: Price,
    pub adjustment: Price,
    pub new_price: Price,
}

impl PricingTableItem {
    fn from_batch(product: &Product, result: &BatchResult) -> Self {
        let (wholesale_price, adjustment, new_price) = if result.is_ok() {
            (result.base_price, result.adjustment, result.new_price)
        } else {
            // Show the product unchanged when it could not be priced
            let wholesale = product.wholesale_price.unwrap_or(Price::ZERO);
            (wholesale, Price::ZERO, wholesale)
        };

        PricingTableItem {
            id: product.id,
            title: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category.clone().unwrap_or_default(),
            wholesale_price,
            adjustment,
            new_price,
        }
    }
}

type CacheKey = (PriceAdjustmentRule, Vec<u32>);

/// Preview generator over a catalog.
///
/// The memo cache is tied to the catalog it was filled from: replacing the
/// catalog clears it.
pub struct PricingPreview {
    catalog: Catalog,
    cache: HashMap<CacheKey, Vec<PricingTableItem>>,
}

impl PricingPreview {
    pub fn new(catalog: Catalog) -> Self {
        PricingPreview {
            catalog,
            cache: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Swaps in a freshly loaded catalog and drops cached previews.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.invalidate();
    }

    /// Drops every cached preview.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Number of cached previews.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Builds preview rows for `selected` ids, in selection order.
    ///
    /// Returns an empty table when nothing is selected or the adjustment
    /// value is not positive. Ids missing from the catalog are skipped.
    pub fn generate(
        &mut self,
        selected: &[u32],
        rule: &PriceAdjustmentRule,
    ) -> Vec<PricingTableItem> {
        if selected.is_empty() {
            return Vec::new();
        }

        let value = rule.adjustment_value;
        if value.is_zero() || value.is_negative() {
            debug!("Adjustment value {} is not positive, no preview", value);
            return Vec::new();
        }

        let key = (*rule, selected.to_vec());
        if let Some(rows) = self.cache.get(&key) {
            debug!("Preview cache hit for {} products", selected.len());
            return rows.clone();
        }

        let rows = self.compute_rows(selected, rule);
        self.cache.insert(key, rows.clone());
        rows
    }

    fn compute_rows(
        &self,
        selected: &[u32],
        rule: &PriceAdjustmentRule,
    ) -> Vec<PricingTableItem> {
        let products: Vec<&Product> = selected
            .iter()
            .filter_map(|&id| {
                let product = self.catalog.get(id);
                if product.is_none() {
                    warn!("Product {} is not in the catalog, skipping", id);
                }
                product
            })
            .collect();

        let items: Vec<BatchItem> = products
            .iter()
            .map(|p| BatchItem::new(p.id, p.wholesale_price))
            .collect();

        let results = compute_batch(&items, rule);

        products
            .iter()
            .zip(results.iter())
            .map(|(product, result)| {
                if let Some(error) = &result.error {
                    debug!("Product {}: {}", product.id, error);
                }
                PricingTableItem::from_batch(product, result)
            })
            .collect()
    }

    /// Validates a profile form and attaches its preview table.
    pub fn build_profile(
        &mut self,
        form: &PricingProfileForm,
    ) -> std::result::Result<PricingProfile, FormValidation> {
        let rule = form.to_rule()?;
        let pricing_table = self.generate(&form.product_ids, &rule);

        Ok(PricingProfile {
            name: form.name.trim().to_string(),
            rule,
            product_ids: form.product_ids.clone(),
            pricing_table,
        })
    }
}

/// Writes preview rows as CSV.
///
/// All monetary values are formatted with exactly 2 decimal places.
pub fn write_csv<W: Write>(rows: &[PricingTableItem], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "id",
        "title",
        "sku",
        "category",
        "wholesale_price",
        "adjustment",
        "new_price",
    ])?;

    for row in rows {
        csv_writer.write_record([
            row.id.to_string(),
            row.title.clone(),
            row.sku.clone(),
            row.category.clone(),
            row.wholesale_price.to_string(),
            row.adjustment.to_string(),
            row.new_price.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{AdjustmentType, IncrementType};
    use std::io::Cursor;
    use std::str::FromStr;

    const CATALOG: &str = "id,name,sku,category,wholesale_price
1,Espresso Beans,COF-001,Coffee,100
2,Decaf Beans,COF-002,Coffee,50
3,Green Tea,TEA-001,Tea,
4,Paper Cups,CUP-010,,19.99";

    fn preview() -> PricingPreview {
        PricingPreview::new(Catalog::load_csv(Cursor::new(CATALOG)).unwrap())
    }

    fn rule(kind: AdjustmentType, value: &str, dir: IncrementType) -> PriceAdjustmentRule {
        PriceAdjustmentRule::new(kind, Price::from_str(value).unwrap(), dir)
    }

    #[test]
    fn test_generate_rows() {
        let mut preview = preview();
        let r = rule(AdjustmentType::Dynamic, "10", IncrementType::Increase);
        let rows = preview.generate(&[1, 4], &r);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Espresso Beans");
        assert_eq!(rows[0].new_price.to_string(), "110.00");
        assert_eq!(rows[0].adjustment.to_string(), "10.00");
        assert_eq!(rows[1].category, "");
        assert_eq!(rows[1].new_price.to_string(), "21.99");
    }

    #[test]
    fn test_rows_follow_selection_order() {
        let mut preview = preview();
        let r = rule(AdjustmentType::Fixed, "1", IncrementType::Increase);
        let rows = preview.generate(&[4, 2, 1], &r);
        let ids: Vec<u32> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn test_failed_rows_fall_back_to_wholesale() {
        let mut preview = preview();
        let r = rule(AdjustmentType::Fixed, "60", IncrementType::Decrease);
        let rows = preview.generate(&[1, 2, 3], &r);

        assert_eq!(rows[0].new_price.to_string(), "40.00");
        // 50 - 60 is rejected, row shows the product unchanged
        assert_eq!(rows[1].wholesale_price.to_string(), "50.00");
        assert_eq!(rows[1].new_price.to_string(), "50.00");
        assert_eq!(rows[1].adjustment, Price::ZERO);
        // No price at all
        assert_eq!(rows[2].wholesale_price, Price::ZERO);
        assert_eq!(rows[2].new_price, Price::ZERO);
    }

    #[test]
    fn test_empty_selection_or_zero_value_gives_empty_table() {
        let mut preview = preview();
        assert!(preview
            .generate(&[], &rule(AdjustmentType::Fixed, "5", IncrementType::Increase))
            .is_empty());
        assert!(preview
            .generate(&[1], &rule(AdjustmentType::Fixed, "0", IncrementType::Increase))
            .is_empty());
        assert_eq!(preview.cached(), 0);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let mut preview = preview();
        let r = rule(AdjustmentType::Fixed, "5", IncrementType::Increase);
        let rows = preview.generate(&[99, 1], &r);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn test_cache_and_invalidation() {
        let mut preview = preview();
        let r = rule(AdjustmentType::Fixed, "5", IncrementType::Increase);

        let first = preview.generate(&[1, 2], &r);
        let second = preview.generate(&[1, 2], &r);
        assert_eq!(first, second);
        assert_eq!(preview.cached(), 1);

        preview.generate(&[2, 1], &r);
        assert_eq!(preview.cached(), 2);

        let csv = "id,name,sku,wholesale_price\n1,Beans,COF-001,200";
        let catalog = Catalog::load_csv(Cursor::new(csv)).unwrap();
        preview.replace_catalog(catalog);
        assert_eq!(preview.cached(), 0);

        let rows = preview.generate(&[1, 2], &r);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].new_price.to_string(), "205.00");
    }

    #[test]
    fn test_build_profile() {
        let mut preview = preview();
        let form = PricingProfileForm {
            name: "  Coffee sale ".to_string(),
            adjustment_type: "dynamic".to_string(),
            adjustment_value: "25".to_string(),
            increment_type: "decrease".to_string(),
            product_ids: vec![1, 2],
        };

        let profile = preview.build_profile(&form).unwrap();
        assert_eq!(profile.name, "Coffee sale");
        assert_eq!(profile.pricing_table.len(), 2);
        assert_eq!(profile.pricing_table[1].new_price.to_string(), "37.50");
    }

    #[test]
    fn test_build_profile_rejects_invalid_form() {
        let mut preview = preview();
        let form = PricingProfileForm {
            name: "ab".to_string(),
            ..Default::default()
        };
        let validation = preview.build_profile(&form).unwrap_err();
        assert!(!validation.is_valid());
    }

    #[test]
    fn test_write_csv() {
        let mut preview = preview();
        let r = rule(AdjustmentType::Dynamic, "20", IncrementType::Decrease);
        let rows = preview.generate(&[2], &r);

        let mut output = Vec::new();
        write_csv(&rows, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.starts_with("id,title,sku,category,wholesale_price,adjustment,new_price"));
        assert!(output.contains("2,Decaf Beans,COF-002,Coffee,50.00,-10.00,40.00"));
    }
}
