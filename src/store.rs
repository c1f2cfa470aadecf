//! Persistence gateway with two privilege tiers.
//!
//! The [`Store`] is built once at start-up and handed to every service by
//! reference. Routine reads and writes go through the standard tier; bulk
//! maintenance (catalog links, category seeding, imports) uses the elevated tier.

use crate::{
    config::database::{DatabaseSettings, create_connection},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

/// Database access at two capability levels.
///
/// Connections are reference counted, so cloning a `Store` never opens a new one.
#[derive(Clone)]
pub struct Store {
    standard: Arc<DatabaseConnection>,
    elevated: Arc<DatabaseConnection>,
}

impl Store {
    /// Wraps two already-open connections.
    #[must_use]
    pub fn new(standard: DatabaseConnection, elevated: DatabaseConnection) -> Self {
        Self {
            standard: Arc::new(standard),
            elevated: Arc::new(elevated),
        }
    }

    /// Uses one connection for both tiers. Used for local databases and tests.
    #[must_use]
    pub fn single(db: DatabaseConnection) -> Self {
        Self::shared(Arc::new(db))
    }

    /// Uses one already shared connection for both tiers.
    #[must_use]
    pub fn shared(db: Arc<DatabaseConnection>) -> Self {
        Self {
            standard: Arc::clone(&db),
            elevated: db,
        }
    }

    /// Opens the configured connections. When no separate elevated URL is set the
    /// standard connection is shared.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let standard = create_connection(&settings.url).await?;
        match settings.elevated_url.as_deref() {
            Some(url) if url != settings.url => {
                info!("Opening separate elevated database connection");
                let elevated = create_connection(url).await?;
                Ok(Self::new(standard, elevated))
            }
            _ => Ok(Self::single(standard)),
        }
    }

    /// Connection for routine operations.
    #[must_use]
    pub fn standard(&self) -> &DatabaseConnection {
        &self.standard
    }

    /// Connection for privileged maintenance operations.
    #[must_use]
    pub fn elevated(&self) -> &DatabaseConnection {
        &self.elevated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::database::create_tables, entities::Partner};
    use sea_orm::{Database, EntityTrait};

    #[tokio::test]
    async fn test_single_store_shares_one_connection() -> Result<()> {
        let store = Store::single(Database::connect("sqlite::memory:").await?);
        let copy = store.clone();

        // Tables created through one tier are visible through the other and the clone
        create_tables(store.elevated()).await?;
        assert!(Partner::find().all(copy.standard()).await?.is_empty());

        Ok(())
    }
}
