//! Category entity - Groups products by trade direction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Category name
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Trade direction stored as text: `"IMPORT"`, `"EXPORT"` or `"BOTH"`
    #[sea_orm(column_name = "type")]
    pub category_type: String,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
