//! Product domain type, input validation and row mapping.
//!
//! A [`Product`] is always read together with its optional category row so the
//! derived `categoryName` / `categoryType` fields are filled at the boundary.

use crate::{
    entities::{category, product},
    errors::{Error, FieldErrors, Result},
    models::{
        category::{Category, CategoryType},
        money,
        partner::clean,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Default price charged to partners
    pub selling_price: Decimal,
    /// Price paid when buying in
    pub purchase_price: Decimal,
    /// Units in stock
    pub stock: u32,
    /// Link to a product image
    pub image_url: Option<String>,
    /// Category the product belongs to
    pub category_id: Option<Uuid>,
    /// Name of that category
    pub category_name: Option<String>,
    /// Trade direction of that category
    pub category_type: Option<CategoryType>,
}

impl Product {
    /// Maps a product row and its joined category row into the domain shape.
    pub fn from_rows(row: product::Model, category: Option<category::Model>) -> Result<Self> {
        let category = category.map(Category::try_from).transpose()?;
        let stock = u32::try_from(row.stock).map_err(|_| Error::Mapping {
            table: "products",
            message: format!("negative stock {} for product {}", row.stock, row.id),
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            selling_price: row.selling_price,
            purchase_price: row.purchase_price,
            stock,
            image_url: row.image_url,
            category_id: row.category_id,
            category_name: category.as_ref().map(|c| c.name.clone()),
            category_type: category.map(|c| c.category_type),
        })
    }
}

/// Input for creating or updating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Display name, must not be blank
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Default selling price, not negative
    pub selling_price: Decimal,
    /// Purchase price, not negative
    pub purchase_price: Decimal,
    /// Units in stock, not negative
    pub stock: i32,
    /// Link to a product image
    pub image_url: Option<String>,
    /// Category to file the product under
    pub category_id: Option<Uuid>,
}

impl ProductInput {
    /// Creates an input with a name and selling price, everything else empty.
    pub fn new(name: impl Into<String>, selling_price: Decimal) -> Self {
        Self {
            name: name.into(),
            selling_price,
            ..Self::default()
        }
    }

    /// Checks required fields and ranges, collecting every failure.
    pub fn validate(&self) -> Result<()> {
        let mut fields = FieldErrors::new();

        if self.name.trim().is_empty() {
            fields.insert("name".to_string(), "Product name cannot be empty".to_string());
        }
        if self.selling_price < Decimal::ZERO {
            fields.insert(
                "sellingPrice".to_string(),
                "Selling price cannot be negative".to_string(),
            );
        }
        if self.purchase_price < Decimal::ZERO {
            fields.insert(
                "purchasePrice".to_string(),
                "Purchase price cannot be negative".to_string(),
            );
        }
        if self.stock < 0 {
            fields.insert("stock".to_string(), "Stock cannot be negative".to_string());
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { fields })
        }
    }

    /// Returns the input with text trimmed and blank optionals cleared.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: clean(self.description),
            image_url: clean(self.image_url),
            selling_price: money::round_money(self.selling_price),
            purchase_price: money::round_money(self.purchase_price),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn row(stock: i32) -> product::Model {
        let now = Utc::now();
        product::Model {
            id: Uuid::new_v4(),
            name: "Widget".to_string(),
            description: None,
            selling_price: dec!(12.00),
            purchase_price: dec!(7.50),
            stock,
            image_url: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_from_rows_fills_category_fields() {
        let category_id = Uuid::new_v4();
        let mut product_row = row(3);
        product_row.category_id = Some(category_id);
        let category_row = category::Model {
            id: category_id,
            name: "Spare Parts".to_string(),
            description: None,
            category_type: "BOTH".to_string(),
        };

        let product = Product::from_rows(product_row, Some(category_row)).unwrap();
        assert_eq!(product.selling_price, dec!(12.00));
        assert_eq!(product.purchase_price, dec!(7.50));
        assert_eq!(product.stock, 3);
        assert_eq!(product.category_name.as_deref(), Some("Spare Parts"));
        assert_eq!(product.category_type, Some(CategoryType::Both));
    }

    #[test]
    fn test_from_rows_rejects_negative_stock() {
        let result = Product::from_rows(row(-1), None);
        assert!(matches!(result, Err(Error::Mapping { table: "products", .. })));
    }

    #[test]
    fn test_validate_reports_each_field() {
        let input = ProductInput {
            name: " ".to_string(),
            selling_price: dec!(-1),
            purchase_price: dec!(-2),
            stock: -5,
            ..ProductInput::default()
        };
        let error = input.validate().unwrap_err();
        let fields = error.field_errors().unwrap();
        assert_eq!(fields.len(), 4);
        assert!(fields.contains_key("sellingPrice"));
        assert!(fields.contains_key("purchasePrice"));
    }

    #[test]
    fn test_normalized_trims_and_rounds() {
        let input = ProductInput {
            description: Some("  ".to_string()),
            ..ProductInput::new("  Bolt ", dec!(0.125))
        }
        .normalized();
        assert_eq!(input.name, "Bolt");
        assert_eq!(input.description, None);
        assert_eq!(input.selling_price, dec!(0.13));
    }
}
