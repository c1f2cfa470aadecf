//! Invoice item entity - One line on an invoice.
//!
//! `product_name` and `unit_price` are snapshots taken when the line was added.
//! `position` keeps the line order stable across saves.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Invoice this line belongs to
    pub invoice_id: Uuid,
    /// Product that was invoiced
    pub product_id: Uuid,
    /// Product name at the time the line was added
    pub product_name: String,
    /// Units invoiced, at least 1
    pub quantity: i32,
    /// Unit price at the time the line was added
    pub unit_price: Decimal,
    /// Quantity times unit price
    pub total: Decimal,
    /// Zero-based line position within the invoice
    pub position: i32,
}

/// Defines relationships between the line and its invoice
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
