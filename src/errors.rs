//! Unified error type for bizdesk.
//!
//! Store failures, referential-integrity refusals and field-level validation
//! failures all surface through [`Error`] so callers can tell them apart.

use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

/// Field name to human-readable message, as produced by input validation.
pub type FieldErrors = BTreeMap<String, String>;

/// Every failure the crate reports.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details from the underlying failure
        message: String,
    },

    /// The store rejected a query
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The `partner_products` table is missing
    #[error("Partner-product catalog is unavailable: {message}")]
    CatalogUnavailable {
        /// Details from the underlying failure
        message: String,
    },

    /// A partner cannot be deleted while invoices reference it
    #[error("Partner {partner_id} cannot be deleted: {invoice_count} invoice(s) reference it")]
    PartnerHasInvoices {
        /// The partner
        partner_id: Uuid,
        /// How many invoices reference it
        invoice_count: u64,
    },

    /// A product cannot be deleted while invoice lines reference it
    #[error("Product {product_id} cannot be deleted: {line_count} invoice line(s) reference it")]
    ProductInUse {
        /// The product
        product_id: Uuid,
        /// How many invoice lines reference it
        line_count: u64,
    },

    /// Input failed validation; `fields` maps field names to messages
    #[error("Validation failed: {}", format_fields(.fields))]
    Validation {
        /// Field name to message
        fields: FieldErrors,
    },

    /// No partner with this ID
    #[error("Partner not found: {id}")]
    PartnerNotFound {
        /// The ID that was looked up
        id: Uuid,
    },

    /// No product with this ID
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// The ID that was looked up
        id: Uuid,
    },

    /// No invoice with this ID
    #[error("Invoice not found: {id}")]
    InvoiceNotFound {
        /// The ID that was looked up
        id: Uuid,
    },

    /// No category with this ID
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// The ID that was looked up
        id: Uuid,
    },

    /// A line quantity is zero or too large
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// A money amount is negative
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: rust_decimal::Decimal,
    },

    /// A stock adjustment would go below zero
    #[error("Stock for product {product_id} would drop below zero (current {current}, change {delta})")]
    InsufficientStock {
        /// The product
        product_id: Uuid,
        /// Stock before the adjustment
        current: i32,
        /// The requested change
        delta: i32,
    },

    /// A stock adjustment would exceed the column range
    #[error("Stock for product {product_id} would exceed the storable maximum (current {current}, change {delta})")]
    StockOverflow {
        /// The product
        product_id: Uuid,
        /// Stock before the adjustment
        current: i32,
        /// The requested change
        delta: i32,
    },

    /// A draft line index does not exist
    #[error("No invoice line at index {index} (draft has {len} line(s))")]
    LineIndexOutOfRange {
        /// The requested index
        index: usize,
        /// Number of lines in the draft
        len: usize,
    },

    /// A stored row holds a value the domain type cannot represent
    #[error("Row in `{table}` could not be mapped: {message}")]
    Mapping {
        /// Table the row came from
        table: &'static str,
        /// Details from the underlying failure
        message: String,
    },

    /// File access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An environment variable could not be read
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The import file could not be read as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Builds a [`Error::Validation`] carrying a single field message.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.into());
        Self::Validation { fields }
    }

    /// Returns the field-level messages when this is a validation failure.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields } => Some(fields),
            _ => None,
        }
    }
}

fn format_fields(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// Convenience `Result` type
/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("partnerId".to_string(), "Partner is required".to_string());
        fields.insert("date".to_string(), "Date is required".to_string());
        let error = Error::Validation { fields };

        assert_eq!(
            error.to_string(),
            "Validation failed: date: Date is required; partnerId: Partner is required"
        );
    }

    #[test]
    fn test_field_helper() {
        let error = Error::field("name", "Name cannot be empty");
        let fields = error.field_errors();
        assert!(fields.is_some());
        assert_eq!(
            fields.and_then(|f| f.get("name")).map(String::as_str),
            Some("Name cannot be empty")
        );
    }
}
