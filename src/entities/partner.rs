//! Partner entity - A business customer or vendor.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Unique identifier for the partner
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Company or person name
    pub name: String,
    /// Contact person
    pub contact: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the partner was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Partner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One partner has many invoices
    #[sea_orm(has_many = "super::invoice::Entity")]
    Invoices,
    /// One partner is linked to many products
    #[sea_orm(has_many = "super::partner_product::Entity")]
    PartnerProducts,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::partner_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartnerProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
