//! Invoice domain types and their mapping from header and line rows.

use crate::{
    entities::{invoice, invoice_item},
    errors::{Error, Result},
    models::money,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Lifecycle status of an invoice.
///
/// Older rows may carry the German label `Entwurf` for drafts; it is accepted on read
/// and written back as `draft`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Being prepared, not yet sent
    #[default]
    #[strum(to_string = "draft", serialize = "Entwurf")]
    Draft,
    /// Sent to the partner, awaiting payment
    #[strum(to_string = "sent")]
    Sent,
    /// Paid in full
    #[strum(to_string = "paid")]
    Paid,
}

/// Largest quantity a single line can hold. Quantities are stored in a signed
/// 32-bit column.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// One line of an invoice. Name and unit price are snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    /// Invoiced product
    pub product_id: Uuid,
    /// Product name snapshot
    pub product_name: String,
    /// Units, at least 1
    pub quantity: u32,
    /// Unit price snapshot, in cents precision
    pub unit_price: Decimal,
    /// Quantity times unit price
    pub total: Decimal,
}

impl InvoiceItem {
    /// Creates a line, computing its total from quantity and unit price.
    pub fn new(
        product_id: Uuid,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        let unit_price = money::round_money(unit_price);
        Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
            total: Decimal::from(quantity) * unit_price,
        }
    }

    /// Adds to the quantity, keeping the unit price, and refreshes the line total.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] when the sum would exceed [`MAX_QUANTITY`];
    /// the line is left unchanged.
    pub fn add_quantity(&mut self, quantity: u32) -> Result<()> {
        let merged = self
            .quantity
            .checked_add(quantity)
            .filter(|q| *q <= MAX_QUANTITY)
            .ok_or(Error::InvalidQuantity {
                quantity: i64::from(self.quantity) + i64::from(quantity),
            })?;
        self.quantity = merged;
        self.total = Decimal::from(self.quantity) * self.unit_price;
        Ok(())
    }

    fn from_row(row: invoice_item::Model) -> Result<Self> {
        let quantity = u32::try_from(row.quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or_else(|| Error::Mapping {
                table: "invoice_items",
                message: format!("invalid quantity {} on line {}", row.quantity, row.id),
            })?;

        Ok(Self {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity,
            unit_price: row.unit_price,
            total: row.total,
        })
    }
}

/// A persisted invoice with its ordered lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice ID
    pub id: Uuid,
    /// Invoiced partner
    pub partner_id: Uuid,
    /// Partner name snapshot
    pub partner_name: String,
    /// Invoice date
    pub date: NaiveDate,
    /// Lines in their stored order
    pub items: Vec<InvoiceItem>,
    /// Sum of line totals
    pub subtotal: Decimal,
    /// Tax on the subtotal
    pub tax: Decimal,
    /// Subtotal plus tax
    pub total: Decimal,
    /// Lifecycle status
    pub status: InvoiceStatus,
    /// Free-form notes
    pub notes: Option<String>,
}

impl Invoice {
    /// Maps a header row and its line rows. Lines are ordered by their stored position.
    pub fn from_rows(header: invoice::Model, mut items: Vec<invoice_item::Model>) -> Result<Self> {
        items.sort_by_key(|item| item.position);
        let status = parse_status(&header.status)?;

        Ok(Self {
            id: header.id,
            partner_id: header.partner_id,
            partner_name: header.partner_name,
            date: header.date,
            items: items
                .into_iter()
                .map(InvoiceItem::from_row)
                .collect::<Result<Vec<_>>>()?,
            subtotal: header.subtotal,
            tax: header.tax,
            total: header.total,
            status,
            notes: header.notes,
        })
    }
}

/// Parses a stored status label.
pub fn parse_status(value: &str) -> Result<InvoiceStatus> {
    value.parse().map_err(|_| Error::Mapping {
        table: "invoices",
        message: format!("unknown invoice status '{value}'"),
    })
}
