//! Product list import.
//!
//! Reads semicolon-delimited lines of the form
//! `name;description;selling_price;purchase_price;stock;category`. Only the name and
//! selling price are required; trailing columns may be left out. A first row whose
//! first cell is `name` is treated as a header. Prices accept a decimal comma.
//!
//! Parsed products can be written out as JSON or pushed into the store through the
//! elevated tier.

use crate::{
    core::product::insert_product,
    entities::Category,
    errors::{Error, Result},
    models::ProductInput,
    store::Store,
};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, TransactionTrait};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path, str::FromStr};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One product read from an import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedProduct {
    /// Product name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Default selling price
    pub selling_price: Decimal,
    /// Purchase price, zero when left out
    pub purchase_price: Decimal,
    /// Units in stock, zero when left out
    pub stock: i32,
    /// Category name, resolved to an ID when pushed
    pub category: Option<String>,
}

impl ImportedProduct {
    fn to_input(&self, category_id: Option<Uuid>) -> ProductInput {
        ProductInput {
            description: self.description.clone(),
            purchase_price: self.purchase_price,
            stock: self.stock,
            category_id,
            ..ProductInput::new(self.name.clone(), self.selling_price)
        }
    }
}

/// A line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    /// 1-based line number in the input
    pub line: u64,
    /// Why the line was rejected
    pub message: String,
}

/// Result of parsing a product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// Products that parsed cleanly, in input order
    pub products: Vec<ImportedProduct>,
    /// Lines that were skipped
    pub errors: Vec<ImportError>,
}

/// Parses a semicolon-delimited product list.
///
/// Lines that fail to parse are collected in [`ImportOutcome::errors`] and do not
/// stop the rest of the input from being read.
pub fn parse_product_list(input: &str) -> Result<ImportOutcome> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let mut outcome = ImportOutcome::default();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(index as u64 + 1, csv::Position::line);

        if index == 0 && is_header(&record) {
            debug!("Skipping header row");
            continue;
        }

        match parse_record(&record) {
            Ok(product) => outcome.products.push(product),
            Err(message) => {
                warn!("Import line {}: {}", line, message);
                outcome.errors.push(ImportError { line, message });
            }
        }
    }

    Ok(outcome)
}

fn is_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|cell| cell.eq_ignore_ascii_case("name"))
}

fn cell<'r>(record: &'r StringRecord, index: usize) -> Option<&'r str> {
    record.get(index).filter(|value| !value.is_empty())
}

fn parse_decimal(field: &str, raw: &str) -> std::result::Result<Decimal, String> {
    Decimal::from_str(&raw.replace(',', "."))
        .map_err(|_| format!("{field} '{raw}' is not a number"))
}

fn parse_record(record: &StringRecord) -> std::result::Result<ImportedProduct, String> {
    let name = cell(record, 0).ok_or("name is missing")?.to_string();
    let selling_price = parse_decimal(
        "selling price",
        cell(record, 2).ok_or("selling price is missing")?,
    )?;
    let purchase_price = cell(record, 3)
        .map(|raw| parse_decimal("purchase price", raw))
        .transpose()?
        .unwrap_or_default();
    let stock = cell(record, 4)
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| format!("stock '{raw}' is not a whole number"))
        })
        .transpose()?
        .unwrap_or_default();

    let product = ImportedProduct {
        name,
        description: cell(record, 1).map(str::to_string),
        selling_price,
        purchase_price,
        stock,
        category: cell(record, 5).map(str::to_string),
    };

    match product.to_input(None).validate() {
        Ok(()) => Ok(product),
        Err(e) => Err(e.to_string()),
    }
}

/// Writes parsed products to `path` as pretty-printed JSON.
pub fn write_json<P: AsRef<Path>>(path: P, products: &[ImportedProduct]) -> Result<()> {
    let json = serde_json::to_string_pretty(products)?;
    std::fs::write(path.as_ref(), json)?;
    info!(
        "Wrote {} product(s) to {}",
        products.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Inserts parsed products through the elevated tier in one transaction.
///
/// Category names are matched case-insensitively against stored categories.
///
/// # Errors
/// Returns [`Error::Validation`] for an unknown category name; nothing is inserted
/// in that case.
pub async fn push_products(store: &Store, products: &[ImportedProduct]) -> Result<usize> {
    let db = store.elevated();
    let categories: HashMap<String, Uuid> = Category::find()
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.name.to_lowercase(), c.id))
        .collect();

    let txn = db.begin().await?;
    for product in products {
        let category_id = match &product.category {
            Some(name) => Some(*categories.get(&name.to_lowercase()).ok_or_else(|| {
                Error::field("category", format!("Unknown category '{name}'"))
            })?),
            None => None,
        };
        insert_product(&txn, product.to_input(category_id)).await?;
    }
    txn.commit().await?;

    info!("Imported {} product(s)", products.len());
    Ok(products.len())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{category::seed_default_categories, product::list_products};
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
name;description;selling_price;purchase_price;stock;category
Hex Bolt M8;Zinc plated;0,45;0,20;500;Spare Parts
Pallet;;12.00
;missing name;1.00
Crate;Wooden;abc
Gloves;Nitrile;3.50;1.10;-4
";

    #[test]
    fn test_parse_product_list() -> Result<()> {
        let outcome = parse_product_list(SAMPLE)?;

        assert_eq!(outcome.products.len(), 2);
        let bolt = &outcome.products[0];
        assert_eq!(bolt.name, "Hex Bolt M8");
        assert_eq!(bolt.description.as_deref(), Some("Zinc plated"));
        assert_eq!(bolt.selling_price, dec!(0.45));
        assert_eq!(bolt.purchase_price, dec!(0.20));
        assert_eq!(bolt.stock, 500);
        assert_eq!(bolt.category.as_deref(), Some("Spare Parts"));

        let pallet = &outcome.products[1];
        assert_eq!(pallet.description, None);
        assert_eq!(pallet.purchase_price, Decimal::ZERO);
        assert_eq!(pallet.stock, 0);
        assert_eq!(pallet.category, None);

        let lines: Vec<u64> = outcome.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![4, 5, 6]);
        assert!(outcome.errors[0].message.contains("name"));
        assert!(outcome.errors[1].message.contains("not a number"));
        assert!(outcome.errors[2].message.contains("Stock cannot be negative"));

        Ok(())
    }

    #[test]
    fn test_parse_without_header() -> Result<()> {
        let outcome = parse_product_list("Washer;;0.05\n# comment\nNut;;0.10;;20\n")?;
        let names: Vec<&str> = outcome.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Washer", "Nut"]);
        assert!(outcome.errors.is_empty());
        Ok(())
    }

    #[test]
    fn test_write_json() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("products.json");
        let outcome = parse_product_list("Washer;Steel;0.05;0.01;100\n")?;

        write_json(&path, &outcome.products)?;

        let written: Vec<ImportedProduct> =
            serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(written, outcome.products);
        Ok(())
    }

    #[tokio::test]
    async fn test_push_products_resolves_categories() -> Result<()> {
        let store = setup_test_db().await?;
        seed_default_categories(&store).await?;
        let outcome = parse_product_list("Bolt;;0.45;;10;spare parts\nPallet;;12.00\n")?;

        assert_eq!(push_products(&store, &outcome.products).await?, 2);

        let products = list_products(&store).await?;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Bolt");
        assert_eq!(products[0].category_name.as_deref(), Some("Spare Parts"));
        assert_eq!(products[1].category_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_push_products_unknown_category_rolls_back() -> Result<()> {
        let store = setup_test_db().await?;
        let outcome = parse_product_list("Bolt;;0.45\nCrate;;5.00;;1;Furniture\n")?;

        let result = push_products(&store, &outcome.products).await;
        assert!(matches!(
            result.unwrap_err().field_errors(),
            Some(fields) if fields.contains_key("category")
        ));
        assert!(list_products(&store).await?.is_empty());

        Ok(())
    }
}
