//! Database configuration module for bizdesk.
//!
//! Handles connection settings and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the stored schema always matches the Rust structs.

use crate::entities::{
    Category, Invoice, InvoiceItem, Partner, PartnerProduct, Product, partner_product,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::Index,
};

const DEFAULT_DATABASE_URL: &str = "sqlite://bizdesk.sqlite?mode=rwc";

/// Connection settings for both privilege tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// URL for routine access
    pub url: String,
    /// URL for privileged access; `None` reuses `url`
    pub elevated_url: Option<String>,
}

impl DatabaseSettings {
    /// Reads `DATABASE_URL` and `DATABASE_ELEVATED_URL` from the environment.
    ///
    /// Falls back to a local `SQLite` file when `DATABASE_URL` is not set.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            elevated_url: std::env::var("DATABASE_ELEVATED_URL").ok(),
        }
    }
}

/// Establishes a connection to the database at `url`.
pub async fn create_connection(url: &str) -> Result<DatabaseConnection> {
    tracing::debug!("Connecting to database");
    Database::connect(url).await.map_err(Into::into)
}

/// Creates every table (and the partner-product pair index) if missing.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<()> {
    create_table(db, Category).await?;
    create_table(db, Product).await?;
    create_table(db, Partner).await?;
    create_table(db, Invoice).await?;
    create_table(db, InvoiceItem).await?;
    create_catalog_table(db).await
}

/// Creates the `partner_products` table and its unique `(partner_id, product_id)` index.
pub async fn create_catalog_table<C: ConnectionTrait>(db: &C) -> Result<()> {
    create_table(db, PartnerProduct).await?;

    let builder = db.get_database_backend();
    let index = Index::create()
        .name("idx_partner_products_pair")
        .table(PartnerProduct)
        .col(partner_product::Column::PartnerId)
        .col(partner_product::Column::ProductId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&index)).await?;
    Ok(())
}

pub(crate) async fn create_table<C, E>(db: &C, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}
