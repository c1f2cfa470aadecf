//! Invoice assembly and persistence.
//!
//! An [`InvoiceDraft`] moves from empty to building as lines are added, merged or
//! removed; its totals are recomputed after every change. [`InvoiceDraft::validate`]
//! turns it into a [`ValidatedInvoice`] without touching the store, and
//! [`save_invoice`] writes header and lines in one database transaction.

use crate::{
    core::{
        catalog::{partner_prices, resolve_price},
        product::get_product,
        totals::{Totals, compute_totals},
    },
    entities::{Invoice, InvoiceItem, invoice, invoice_item},
    errors::{Error, FieldErrors, Result},
    models::{
        Invoice as InvoiceView, InvoiceItem as Line, InvoiceStatus, invoice::MAX_QUANTITY,
        partner::clean,
    },
    store::Store,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Progress of a draft before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// No lines yet
    Empty,
    /// At least one line
    Building,
}

/// A product and quantity picked for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSelection {
    /// Product to add
    pub product_id: Uuid,
    /// Units to add, at least 1
    pub quantity: u32,
}

impl ProductSelection {
    /// Selects `quantity` units of a product.
    #[must_use]
    pub const fn new(product_id: Uuid, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// An invoice being composed. New drafts have no ID; drafts reopened from a saved
/// invoice keep theirs so saving updates in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    id: Option<Uuid>,
    partner_id: Option<Uuid>,
    partner_name: Option<String>,
    date: Option<NaiveDate>,
    status: InvoiceStatus,
    notes: Option<String>,
    items: Vec<Line>,
    totals: Totals,
}

impl InvoiceDraft {
    /// Creates an empty draft with no partner, date or lines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reopens a saved invoice for editing. Lines keep their snapshot prices.
    #[must_use]
    pub fn from_invoice(invoice: InvoiceView) -> Self {
        let totals = compute_totals(&invoice.items);
        Self {
            id: Some(invoice.id),
            partner_id: Some(invoice.partner_id),
            partner_name: Some(invoice.partner_name),
            date: Some(invoice.date),
            status: invoice.status,
            notes: invoice.notes,
            items: invoice.items,
            totals,
        }
    }

    /// ID of the saved invoice this draft edits, `None` for a new one.
    #[must_use]
    pub const fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Selected partner, if any.
    #[must_use]
    pub const fn partner_id(&self) -> Option<Uuid> {
        self.partner_id
    }

    /// Sets the partner and snapshots its name.
    pub fn set_partner(&mut self, partner_id: Uuid, partner_name: impl Into<String>) {
        self.partner_id = Some(partner_id);
        self.partner_name = Some(partner_name.into());
    }

    /// Sets the invoice date.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    /// Sets the status the invoice is saved with.
    pub fn set_status(&mut self, status: InvoiceStatus) {
        self.status = status;
    }

    /// Sets the notes; blank text clears them.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = clean(notes);
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[Line] {
        &self.items
    }

    /// Totals of the current lines.
    #[must_use]
    pub const fn totals(&self) -> Totals {
        self.totals
    }

    /// Whether the draft has any lines yet.
    #[must_use]
    pub fn state(&self) -> DraftState {
        if self.items.is_empty() {
            DraftState::Empty
        } else {
            DraftState::Building
        }
    }

    /// Adds a line, merging into an existing line for the same product.
    ///
    /// A merge adds the quantities and keeps the unit price of the existing line.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] for a zero quantity, a quantity above
    /// [`MAX_QUANTITY`] or a merge whose sum would exceed it, and
    /// [`Error::InvalidAmount`] for a negative unit price. The draft is unchanged on error.
    pub fn add_line(
        &mut self,
        product_id: Uuid,
        product_name: &str,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<()> {
        check_quantity(quantity)?;
        if unit_price < Decimal::ZERO {
            return Err(Error::InvalidAmount { amount: unit_price });
        }

        match self.items.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.add_quantity(quantity)?,
            None => self
                .items
                .push(Line::new(product_id, product_name, quantity, unit_price)),
        }
        self.recompute();
        Ok(())
    }

    /// Removes the line at `index` and returns it.
    pub fn remove_line(&mut self, index: usize) -> Result<Line> {
        if index >= self.items.len() {
            return Err(Error::LineIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let line = self.items.remove(index);
        self.recompute();
        Ok(line)
    }

    fn recompute(&mut self) {
        self.totals = compute_totals(&self.items);
    }

    /// Checks that partner, date and at least one line are present.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] listing every missing field.
    pub fn validate(&self) -> Result<ValidatedInvoice> {
        let mut fields = FieldErrors::new();
        if self.partner_id.is_none() || self.partner_name.is_none() {
            fields.insert("partnerId".to_string(), "Partner is required".to_string());
        }
        if self.date.is_none() {
            fields.insert("date".to_string(), "Date is required".to_string());
        }
        if self.items.is_empty() {
            fields.insert(
                "items".to_string(),
                "At least one item is required".to_string(),
            );
        }

        match (self.partner_id, self.partner_name.clone(), self.date) {
            (Some(partner_id), Some(partner_name), Some(date)) if fields.is_empty() => {
                Ok(ValidatedInvoice {
                    id: self.id,
                    partner_id,
                    partner_name,
                    date,
                    status: self.status,
                    notes: self.notes.clone(),
                    items: self.items.clone(),
                    totals: compute_totals(&self.items),
                })
            }
            _ => Err(Error::Validation { fields }),
        }
    }
}

fn check_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(Error::InvalidQuantity {
            quantity: i64::from(quantity),
        });
    }
    Ok(())
}

/// A draft that passed validation and can be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    id: Option<Uuid>,
    partner_id: Uuid,
    partner_name: String,
    date: NaiveDate,
    status: InvoiceStatus,
    notes: Option<String>,
    items: Vec<Line>,
    totals: Totals,
}

impl ValidatedInvoice {
    /// Whether saving will create a new invoice rather than update one.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Totals that will be stored with the header.
    #[must_use]
    pub const fn totals(&self) -> Totals {
        self.totals
    }
}

/// Adds products to a draft, pricing each line from the draft partner's overrides.
///
/// Every selection is checked and priced before the draft changes, so a failure leaves
/// the draft as it was. Prices are resolved now and stored on the line; later override
/// changes do not affect it.
pub async fn add_products(
    store: &Store,
    draft: &mut InvoiceDraft,
    selections: &[ProductSelection],
) -> Result<()> {
    let overrides = match draft.partner_id() {
        Some(partner_id) => partner_prices(store, partner_id).await?,
        None => HashMap::new(),
    };

    let mut priced = Vec::with_capacity(selections.len());
    for selection in selections {
        check_quantity(selection.quantity)?;
        let product = get_product(store, selection.product_id)
            .await?
            .ok_or(Error::ProductNotFound {
                id: selection.product_id,
            })?;
        let unit_price = resolve_price(&product, overrides.get(&product.id).copied());
        priced.push((product, unit_price, selection.quantity));
    }

    // Merges can still overflow, so apply to a copy and swap it in at the end
    let mut updated = draft.clone();
    for (product, unit_price, quantity) in priced {
        updated.add_line(product.id, &product.name, unit_price, quantity)?;
    }
    *draft = updated;
    debug!(
        "Draft now has {} line(s), total {}",
        draft.items().len(),
        draft.totals().total
    );
    Ok(())
}

/// Saves a validated invoice. Header and lines are written in one transaction.
///
/// New invoices get a fresh UUID. Existing invoices have their header updated and all
/// lines replaced; if any step fails nothing is changed.
///
/// # Errors
/// Returns [`Error::InvoiceNotFound`] when updating an invoice that no longer exists.
pub async fn save_invoice(store: &Store, invoice: ValidatedInvoice) -> Result<InvoiceView> {
    let txn = store.standard().begin().await?;
    let now = Utc::now();
    let totals = invoice.totals;

    let invoice_id = if let Some(id) = invoice.id {
        let mut header: invoice::ActiveModel = Invoice::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(Error::InvoiceNotFound { id })?
            .into();
        header.partner_id = Set(invoice.partner_id);
        header.partner_name = Set(invoice.partner_name.clone());
        header.date = Set(invoice.date);
        header.subtotal = Set(totals.subtotal);
        header.tax = Set(totals.tax);
        header.total = Set(totals.total);
        header.status = Set(invoice.status.to_string());
        header.notes = Set(invoice.notes.clone());
        header.updated_at = Set(now);
        header.update(&txn).await?;

        InvoiceItem::delete_many()
            .filter(invoice_item::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        id
    } else {
        let id = Uuid::new_v4();
        invoice::ActiveModel {
            id: Set(id),
            partner_id: Set(invoice.partner_id),
            partner_name: Set(invoice.partner_name.clone()),
            date: Set(invoice.date),
            subtotal: Set(totals.subtotal),
            tax: Set(totals.tax),
            total: Set(totals.total),
            status: Set(invoice.status.to_string()),
            notes: Set(invoice.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        id
    };

    insert_lines(&txn, invoice_id, &invoice.items).await?;
    txn.commit().await?;

    info!(
        "Saved invoice {} for '{}' ({} line(s), total {})",
        invoice_id,
        invoice.partner_name,
        invoice.items.len(),
        totals.total
    );

    Ok(InvoiceView {
        id: invoice_id,
        partner_id: invoice.partner_id,
        partner_name: invoice.partner_name,
        date: invoice.date,
        items: invoice.items,
        subtotal: totals.subtotal,
        tax: totals.tax,
        total: totals.total,
        status: invoice.status,
        notes: invoice.notes,
    })
}

async fn insert_lines<C: ConnectionTrait>(db: &C, invoice_id: Uuid, lines: &[Line]) -> Result<()> {
    let rows = lines
        .iter()
        .enumerate()
        .map(|(position, line)| -> Result<invoice_item::ActiveModel> {
            Ok(invoice_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                product_id: Set(line.product_id),
                product_name: Set(line.product_name.clone()),
                quantity: Set(i32::try_from(line.quantity).map_err(|_| {
                    Error::InvalidQuantity {
                        quantity: i64::from(line.quantity),
                    }
                })?),
                unit_price: Set(line.unit_price),
                total: Set(line.total),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if rows.is_empty() {
        return Ok(());
    }
    InvoiceItem::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Retrieves an invoice with its lines.
pub async fn get_invoice(store: &Store, invoice_id: Uuid) -> Result<Option<InvoiceView>> {
    let db = store.standard();
    let Some(header) = Invoice::find_by_id(invoice_id).one(db).await? else {
        return Ok(None);
    };

    let lines = InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(invoice_item::Column::Position)
        .all(db)
        .await?;
    InvoiceView::from_rows(header, lines).map(Some)
}

/// Lists invoices newest first, optionally only those of one partner.
pub async fn list_invoices(store: &Store, partner_id: Option<Uuid>) -> Result<Vec<InvoiceView>> {
    let db = store.standard();
    let mut query = Invoice::find()
        .order_by_desc(invoice::Column::Date)
        .order_by_desc(invoice::Column::CreatedAt);
    if let Some(partner_id) = partner_id {
        query = query.filter(invoice::Column::PartnerId.eq(partner_id));
    }
    let headers = query.all(db).await?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = headers.iter().map(|h| h.id).collect();
    let mut lines_by_invoice: HashMap<Uuid, Vec<invoice_item::Model>> = HashMap::new();
    for line in InvoiceItem::find()
        .filter(invoice_item::Column::InvoiceId.is_in(ids))
        .all(db)
        .await?
    {
        lines_by_invoice
            .entry(line.invoice_id)
            .or_default()
            .push(line);
    }

    headers
        .into_iter()
        .map(|header| {
            let lines = lines_by_invoice.remove(&header.id).unwrap_or_default();
            InvoiceView::from_rows(header, lines)
        })
        .collect()
}

/// Changes the status of a saved invoice.
pub async fn update_status(
    store: &Store,
    invoice_id: Uuid,
    status: InvoiceStatus,
) -> Result<InvoiceView> {
    let db = store.standard();
    let mut header: invoice::ActiveModel = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?
        .into();
    header.status = Set(status.to_string());
    header.updated_at = Set(Utc::now());
    header.update(db).await?;

    info!("Invoice {} is now {}", invoice_id, status);
    get_invoice(store, invoice_id)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })
}

/// Deletes an invoice and its lines in one transaction.
pub async fn delete_invoice(store: &Store, invoice_id: Uuid) -> Result<()> {
    let txn = store.standard().begin().await?;

    Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or(Error::InvoiceNotFound { id: invoice_id })?;

    InvoiceItem::delete_many()
        .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
        .exec(&txn)
        .await?;
    Invoice::delete_by_id(invoice_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted invoice {}", invoice_id);
    Ok(())
}
