//! Shared test utilities for bizdesk.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    config::database::{create_table, create_tables},
    core::{
        invoice::{InvoiceDraft, save_invoice},
        partner, product,
    },
    entities,
    errors::Result,
    models::{Invoice, Partner, PartnerInput, Product, ProductInput},
    store::Store,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::Database;

/// Creates an in-memory `SQLite` store with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<Store> {
    let db = Database::connect("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(Store::single(db))
}

/// Creates an in-memory store where the `partner_products` table was never created.
pub async fn setup_test_db_without_catalog() -> Result<Store> {
    let db = Database::connect("sqlite::memory:").await?;
    create_table(&db, entities::Category).await?;
    create_table(&db, entities::Product).await?;
    create_table(&db, entities::Partner).await?;
    create_table(&db, entities::Invoice).await?;
    create_table(&db, entities::InvoiceItem).await?;
    Ok(Store::single(db))
}

/// Creates a test partner with only a name.
pub async fn create_test_partner(store: &Store, name: &str) -> Result<Partner> {
    partner::create_partner(store, PartnerInput::named(name)).await
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * selling price: 10.00
/// * stock: 10
pub async fn create_test_product(store: &Store, name: &str) -> Result<Product> {
    create_custom_product(store, name, dec!(10.00), 10).await
}

/// Creates a test product with custom price and stock.
pub async fn create_custom_product(
    store: &Store,
    name: &str,
    price: Decimal,
    stock: i32,
) -> Result<Product> {
    product::create_product(
        store,
        ProductInput {
            stock,
            ..ProductInput::new(name, price)
        },
    )
    .await
}

/// Sets up a store with one partner and one product priced at 10.00.
/// Returns (store, partner, product) for invoice and catalog tests.
pub async fn setup_with_partner_and_product() -> Result<(Store, Partner, Product)> {
    let store = setup_test_db().await?;
    let partner = create_test_partner(&store, "Test Partner").await?;
    let product = create_test_product(&store, "Test Product").await?;
    Ok((store, partner, product))
}

/// Saves a draft invoice with a single line at the product's selling price.
///
/// The invoice is dated 2024-05-17.
pub async fn create_test_invoice(
    store: &Store,
    partner: &Partner,
    product: &Product,
    quantity: u32,
) -> Result<Invoice> {
    let mut draft = InvoiceDraft::new();
    draft.set_partner(partner.id, partner.name.clone());
    draft.set_date(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap_or_default());
    draft.add_line(product.id, &product.name, product.selling_price, quantity)?;
    save_invoice(store, draft.validate()?).await
}
