//! Partner-product link domain types.

use crate::{
    entities::partner_product,
    errors::Result,
    models::product::Product,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A partner's permission to buy a product, with an optional price override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProductLink {
    /// Partner side of the link
    pub partner_id: Uuid,
    /// Product side of the link
    pub product_id: Uuid,
    /// Price charged to this partner instead of the selling price
    pub partner_price: Option<Decimal>,
}

impl TryFrom<partner_product::Model> for PartnerProductLink {
    type Error = crate::errors::Error;

    fn try_from(row: partner_product::Model) -> Result<Self> {
        Ok(Self {
            partner_id: row.partner_id,
            product_id: row.product_id,
            partner_price: row.partner_price,
        })
    }
}

/// A product as seen from one partner's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProduct {
    /// The linked product
    pub product: Product,
    /// Override price, if one is set
    pub partner_price: Option<Decimal>,
}

impl LinkedProduct {
    /// The price a new invoice line for this partner would use.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.partner_price.unwrap_or(self.product.selling_price)
    }
}
