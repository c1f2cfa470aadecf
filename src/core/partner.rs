//! Partner business logic - Handles all partner-related operations.
//!
//! A partner that is referenced by any invoice cannot be deleted. The check runs
//! in application code, inside the same transaction as the delete.

use crate::{
    core::catalog::{catalog_error, catalog_table_exists},
    entities::{Invoice, Partner, PartnerProduct, invoice, partner, partner_product},
    errors::{Error, Result},
    models::{Partner as PartnerView, PartnerInput, partner::clean},
    store::Store,
};
use chrono::Utc;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Retrieves all partners ordered alphabetically by name.
pub async fn list_partners(store: &Store) -> Result<Vec<PartnerView>> {
    Ok(Partner::find()
        .order_by_asc(partner::Column::Name)
        .all(store.standard())
        .await?
        .into_iter()
        .map(PartnerView::from)
        .collect())
}

/// Retrieves a partner by ID.
pub async fn get_partner(store: &Store, partner_id: Uuid) -> Result<Option<PartnerView>> {
    Ok(Partner::find_by_id(partner_id)
        .one(store.standard())
        .await?
        .map(PartnerView::from))
}

/// Creates a new partner after validating the input.
///
/// # Errors
/// Returns [`Error::Validation`] for a blank name or a malformed email.
pub async fn create_partner(store: &Store, input: PartnerInput) -> Result<PartnerView> {
    input.validate()?;

    let partner = partner::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        contact: Set(clean(input.contact)),
        email: Set(clean(input.email)),
        phone: Set(clean(input.phone)),
        address: Set(clean(input.address)),
        notes: Set(clean(input.notes)),
        created_at: Set(Utc::now()),
    };
    let row = partner.insert(store.standard()).await?;

    info!("Created partner '{}' ({})", row.name, row.id);
    Ok(row.into())
}

/// Replaces a partner's fields.
///
/// Invoices keep the partner name they were written with.
pub async fn update_partner(
    store: &Store,
    partner_id: Uuid,
    input: PartnerInput,
) -> Result<PartnerView> {
    input.validate()?;
    let db = store.standard();

    let mut partner: partner::ActiveModel = Partner::find_by_id(partner_id)
        .one(db)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?
        .into();

    partner.name = Set(input.name.trim().to_string());
    partner.contact = Set(clean(input.contact));
    partner.email = Set(clean(input.email));
    partner.phone = Set(clean(input.phone));
    partner.address = Set(clean(input.address));
    partner.notes = Set(clean(input.notes));

    let row = partner.update(db).await?;
    info!("Updated partner {}", partner_id);
    Ok(row.into())
}

/// Counts the invoices that reference a partner.
pub async fn count_invoices_for_partner(store: &Store, partner_id: Uuid) -> Result<u64> {
    invoice_count(store.standard(), partner_id).await
}

async fn invoice_count<C: ConnectionTrait>(db: &C, partner_id: Uuid) -> Result<u64> {
    Invoice::find()
        .filter(invoice::Column::PartnerId.eq(partner_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Deletes a partner and its catalog links. Without a `partner_products` table
/// there are no links to remove and only the partner is deleted.
///
/// # Errors
/// - [`Error::PartnerNotFound`] if no such partner exists
/// - [`Error::PartnerHasInvoices`] if any invoice references the partner; nothing is
///   deleted in that case
pub async fn delete_partner(store: &Store, partner_id: Uuid) -> Result<()> {
    let has_catalog = catalog_table_exists(store.standard()).await?;
    let txn = store.standard().begin().await?;

    Partner::find_by_id(partner_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    let invoice_count = invoice_count(&txn, partner_id).await?;
    if invoice_count > 0 {
        return Err(Error::PartnerHasInvoices {
            partner_id,
            invoice_count,
        });
    }

    if has_catalog {
        PartnerProduct::delete_many()
            .filter(partner_product::Column::PartnerId.eq(partner_id))
            .exec(&txn)
            .await
            .map_err(catalog_error)?;
    }
    Partner::delete_by_id(partner_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted partner {}", partner_id);
    Ok(())
}
