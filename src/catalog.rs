//! Product catalog loaded from CSV, plus search and dropdown filtering.

use crate::decimal::Price;
use crate::error::Result;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

/// Raw product row as read from CSV.
///
/// Every optional column is read as a string so a single malformed price
/// doesn't reject the whole row.
#[derive(Debug, Deserialize)]
pub struct ProductRecord {
    pub id: u32,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub wholesale_price: Option<String>,
}

impl ProductRecord {
    /// Converts the raw record into a [`Product`].
    pub fn into_product(self) -> Product {
        let wholesale_price = parse_price(self.wholesale_price.as_deref());

        Product {
            id: self.id,
            name: self.name.trim().to_string(),
            sku: self.sku.trim().to_string(),
            category: non_blank(self.category),
            sub_category: non_blank(self.sub_category),
            segment: non_blank(self.segment),
            brand: non_blank(self.brand),
            wholesale_price,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_price(value: Option<&str>) -> Option<Price> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Price::from_str(trimmed).ok()
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub sku: String,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub segment: Option<String>,
    pub brand: Option<String>,

    /// Global wholesale price. `None` when missing or unparsable.
    pub wholesale_price: Option<Price>,
}

/// Dropdown and search filters. Unset or blank fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    /// Case-insensitive substring match against name or SKU.
    pub search: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub segment: Option<String>,
    pub brand: Option<String>,
    pub sku: Option<String>,
}

impl ProductFilters {
    /// Returns `true` if no filter is active.
    pub fn is_empty(&self) -> bool {
        [
            &self.search,
            &self.category,
            &self.sub_category,
            &self.segment,
            &self.brand,
            &self.sku,
        ]
        .iter()
        .all(|f| active(f).is_none())
    }

    /// Returns `true` if the product passes every active filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(search) = active(&self.search) {
            let needle = search.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.sku.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        field_matches(&self.category, product.category.as_deref())
            && field_matches(&self.sub_category, product.sub_category.as_deref())
            && field_matches(&self.segment, product.segment.as_deref())
            && field_matches(&self.brand, product.brand.as_deref())
            && field_matches(&self.sku, Some(product.sku.as_str()))
    }
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().map(str::trim).filter(|f| !f.is_empty())
}

fn field_matches(filter: &Option<String>, value: Option<&str>) -> bool {
    match active(filter) {
        None => true,
        Some(wanted) => value.is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
    }
}

/// In-memory product catalog.
///
/// Keeps products in the order they were loaded; lookups go through an
/// id index.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Loads products from a CSV reader.
    ///
    /// Invalid rows are logged at warn level and skipped. When an id repeats,
    /// the first row wins.
    pub fn load_csv<R: Read>(reader: R) -> Result<Self> {
        let mut catalog = Catalog::new();
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<ProductRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    let product = record.into_product();
                    if product.wholesale_price.is_none() {
                        debug!("Row {}: Product {} has no wholesale price", row_num, product.id);
                    }
                    if !catalog.insert(product) {
                        warn!("Row {}: Duplicate product ID, ignoring", row_num);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        debug!("Loaded {} products", catalog.len());
        Ok(catalog)
    }

    /// Adds a product. Returns `false` if the id is already present.
    pub fn insert(&mut self, product: Product) -> bool {
        if self.index.contains_key(&product.id) {
            return false;
        }
        self.index.insert(product.id, self.products.len());
        self.products.push(product);
        true
    }

    pub fn get(&self, id: u32) -> Option<&Product> {
        self.index.get(&id).map(|&i| &self.products[i])
    }

    /// All product ids, in catalog order.
    pub fn ids(&self) -> Vec<u32> {
        self.products.iter().map(|p| p.id).collect()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products passing `filters`, in catalog order.
    pub fn filter(&self, filters: &ProductFilters) -> Vec<&Product> {
        self.products.iter().filter(|p| filters.matches(p)).collect()
    }
}
