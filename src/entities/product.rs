//! Product entity - Represents a stocked item that can be invoiced.
//!
//! Money columns hold `Decimal` values rounded to cents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name of the product
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Default price charged to partners without an override
    pub selling_price: Decimal,
    /// Price paid when purchasing the product
    pub purchase_price: Decimal,
    /// Units in stock, never negative
    pub stock: i32,
    /// Link to a product image
    pub image_url: Option<String>,
    /// Optional category this product belongs to
    pub category_id: Option<Uuid>,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One product is linked to many partners
    #[sea_orm(has_many = "super::partner_product::Entity")]
    PartnerProducts,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::partner_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartnerProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
