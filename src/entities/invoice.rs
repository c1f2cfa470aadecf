//! Invoice entity - Invoice header with denormalized partner name and totals.
//!
//! Totals are always written from the totals engine, never edited on their own.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice header database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    /// Unique identifier for the invoice
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Partner being invoiced
    pub partner_id: Uuid,
    /// Partner name at the time the invoice was written
    pub partner_name: String,
    /// Invoice date
    pub date: Date,
    /// Sum of all line totals
    pub subtotal: Decimal,
    /// Tax on the subtotal, rounded to cents
    pub tax: Decimal,
    /// Subtotal plus tax
    pub total: Decimal,
    /// Status stored as text: `"draft"`, `"sent"` or `"paid"`
    pub status: String,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the invoice was first saved
    pub created_at: DateTimeUtc,
    /// When the invoice was last saved
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each invoice belongs to one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
    /// One invoice has many line items
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    Items,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
