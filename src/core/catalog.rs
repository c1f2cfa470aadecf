//! Partner-product catalog and price resolution.
//!
//! A link says "this partner buys this product", optionally at a partner-specific
//! price. Invoice lines resolve their unit price through [`resolve_price`] once,
//! when the line is added; later override changes never touch existing lines.
//!
//! A store without the `partner_products` table reports
//! [`Error::CatalogUnavailable`] instead of pretending the operation worked.

use crate::{
    core::product::list_products,
    entities::{Partner, PartnerProduct, Product, partner_product},
    errors::{Error, Result},
    models::{LinkedProduct, PartnerProductLink, Product as ProductView, money},
    store::Store,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Set, prelude::*};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Returns the price a new invoice line should use: the partner override when
/// present, otherwise the product's selling price.
#[must_use]
pub fn resolve_price(product: &ProductView, partner_price: Option<Decimal>) -> Decimal {
    partner_price.unwrap_or(product.selling_price)
}

/// Whether a store error means the table itself does not exist.
pub(crate) fn is_missing_table(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("no such table") || message.contains("does not exist")
}

/// Maps store errors on the link table, turning a missing table into
/// [`Error::CatalogUnavailable`].
pub(crate) fn catalog_error(err: DbErr) -> Error {
    if is_missing_table(&err) {
        warn!("Partner-product table is missing: {}", err);
        Error::CatalogUnavailable {
            message: err.to_string(),
        }
    } else {
        Error::Database(err)
    }
}

/// Whether the store has a `partner_products` table.
pub(crate) async fn catalog_table_exists<C: ConnectionTrait>(db: &C) -> Result<bool> {
    match PartnerProduct::find().one(db).await {
        Ok(_) => Ok(true),
        Err(e) if is_missing_table(&e) => {
            debug!("No partner-product table, skipping link cleanup");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Links a product to a partner, or updates the override price of an existing link.
///
/// Idempotent: linking twice leaves one link. Passing `None` for the price keeps an
/// existing override untouched.
///
/// # Errors
/// - [`Error::InvalidAmount`] for a negative override
/// - [`Error::PartnerNotFound`] / [`Error::ProductNotFound`] when creating a link to
///   unknown records
/// - [`Error::CatalogUnavailable`] when the link table is missing
pub async fn link_product(
    store: &Store,
    partner_id: Uuid,
    product_id: Uuid,
    partner_price: Option<Decimal>,
) -> Result<PartnerProductLink> {
    if let Some(price) = partner_price.filter(|price| *price < Decimal::ZERO) {
        return Err(Error::InvalidAmount { amount: price });
    }
    let db = store.elevated();

    let existing = find_link(store, partner_id, product_id).await?;
    let row = if let Some(link) = existing {
        match partner_price {
            Some(price) => {
                let mut link: partner_product::ActiveModel = link.into();
                link.partner_price = Set(Some(money::round_money(price)));
                link.update(db).await.map_err(catalog_error)?
            }
            None => link,
        }
    } else {
        Partner::find_by_id(partner_id)
            .one(db)
            .await?
            .ok_or(Error::PartnerNotFound { id: partner_id })?;
        Product::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or(Error::ProductNotFound { id: product_id })?;

        let link = partner_product::ActiveModel {
            id: Set(Uuid::new_v4()),
            partner_id: Set(partner_id),
            product_id: Set(product_id),
            partner_price: Set(partner_price.map(money::round_money)),
            created_at: Set(Utc::now()),
        };
        link.insert(db).await.map_err(catalog_error)?
    };

    info!("Linked product {} to partner {}", product_id, partner_id);
    PartnerProductLink::try_from(row)
}

/// Clears the override price of a link, so new lines use the selling price again.
pub async fn clear_partner_price(
    store: &Store,
    partner_id: Uuid,
    product_id: Uuid,
) -> Result<Option<PartnerProductLink>> {
    let Some(link) = find_link(store, partner_id, product_id).await? else {
        return Ok(None);
    };

    let mut link: partner_product::ActiveModel = link.into();
    link.partner_price = Set(None);
    let row = link.update(store.elevated()).await.map_err(catalog_error)?;
    PartnerProductLink::try_from(row).map(Some)
}

/// Removes the link between a partner and a product. Removing a missing link is a no-op.
///
/// Returns whether a link was removed.
pub async fn unlink_product(store: &Store, partner_id: Uuid, product_id: Uuid) -> Result<bool> {
    let result = PartnerProduct::delete_many()
        .filter(partner_product::Column::PartnerId.eq(partner_id))
        .filter(partner_product::Column::ProductId.eq(product_id))
        .exec(store.elevated())
        .await
        .map_err(catalog_error)?;

    if result.rows_affected > 0 {
        info!("Unlinked product {} from partner {}", product_id, partner_id);
    }
    Ok(result.rows_affected > 0)
}

async fn find_link(
    store: &Store,
    partner_id: Uuid,
    product_id: Uuid,
) -> Result<Option<partner_product::Model>> {
    PartnerProduct::find()
        .filter(partner_product::Column::PartnerId.eq(partner_id))
        .filter(partner_product::Column::ProductId.eq(product_id))
        .one(store.elevated())
        .await
        .map_err(catalog_error)
}

/// Returns the override price of a partner for a product, if one is set.
pub async fn partner_price(
    store: &Store,
    partner_id: Uuid,
    product_id: Uuid,
) -> Result<Option<Decimal>> {
    let link = find_link(store, partner_id, product_id).await?;
    Ok(link
        .map(PartnerProductLink::try_from)
        .transpose()?
        .and_then(|link| link.partner_price))
}

/// All links of a partner.
pub async fn partner_links(store: &Store, partner_id: Uuid) -> Result<Vec<PartnerProductLink>> {
    PartnerProduct::find()
        .filter(partner_product::Column::PartnerId.eq(partner_id))
        .all(store.standard())
        .await
        .map_err(catalog_error)?
        .into_iter()
        .map(PartnerProductLink::try_from)
        .collect()
}

/// Override prices of a partner keyed by product. Links without an override are omitted.
pub async fn partner_prices(store: &Store, partner_id: Uuid) -> Result<HashMap<Uuid, Decimal>> {
    Ok(partner_links(store, partner_id)
        .await?
        .into_iter()
        .filter_map(|link| link.partner_price.map(|price| (link.product_id, price)))
        .collect())
}

/// Products linked to a partner, ordered by product name, with their override prices.
pub async fn linked_products(store: &Store, partner_id: Uuid) -> Result<Vec<LinkedProduct>> {
    let links: HashMap<Uuid, Option<Decimal>> = partner_links(store, partner_id)
        .await?
        .into_iter()
        .map(|link| (link.product_id, link.partner_price))
        .collect();

    let products = list_products(store).await?;
    debug!(
        "Partner {} has {} linked product(s)",
        partner_id,
        links.len()
    );

    Ok(products
        .into_iter()
        .filter_map(|product| {
            links.get(&product.id).map(|partner_price| LinkedProduct {
                product,
                partner_price: *partner_price,
            })
        })
        .collect())
}

/// Products not yet linked to a partner, ordered by name.
///
/// Together with [`linked_products`] this covers every product exactly once.
pub async fn list_available_products(store: &Store, partner_id: Uuid) -> Result<Vec<ProductView>> {
    let linked: HashSet<Uuid> = partner_links(store, partner_id)
        .await?
        .into_iter()
        .map(|link| link.product_id)
        .collect();

    Ok(list_products(store)
        .await?
        .into_iter()
        .filter(|product| !linked.contains(&product.id))
        .collect())
}
