//! Partner-product link entity - Which products a partner buys, and at what price.
//!
//! The `(partner_id, product_id)` pair is unique; the index is created alongside the
//! table in [`crate::config::database::create_tables`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner-product link database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partner_products")]
pub struct Model {
    /// Unique identifier for the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Partner allowed to buy the product
    pub partner_id: Uuid,
    /// Product the partner may buy
    pub product_id: Uuid,
    /// Price override for this partner; `None` means the product's selling price applies
    pub partner_price: Option<Decimal>,
    /// When the link was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between the link and the entities it joins
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
