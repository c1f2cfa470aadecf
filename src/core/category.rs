//! Category business logic with a built-in fallback set.
//!
//! When the category table is empty or cannot be read, [`list_categories`] returns
//! six built-in categories with fixed UUIDs. The listing always says which source it
//! came from.

use crate::{
    entities::{Category, Product, category, product},
    errors::{Error, Result},
    models::{Category as CategoryView, CategoryInput, CategoryType, partner::clean},
    store::Store,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use serde::Serialize;
use tracing::{info, warn};

/// Where a category listing came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CategorySource {
    /// Read from the store
    Store,
    /// The built-in set, used because the store had nothing usable
    BuiltIn {
        /// Why the store could not be used
        reason: String,
    },
}

/// A list of categories plus its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListing {
    /// Categories ordered by name
    pub categories: Vec<CategoryView>,
    /// Whether these came from the store or the built-in set
    pub source: CategorySource,
}

impl CategoryListing {
    /// Whether the built-in set is being used instead of stored data.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self.source, CategorySource::BuiltIn { .. })
    }
}

const BUILT_IN: [(u128, &str, &str, CategoryType); 6] = [
    (
        0x6f1c_2a40_0000_4000_8000_0000_0000_0001,
        "Raw Materials",
        "Unprocessed materials bought from suppliers",
        CategoryType::Import,
    ),
    (
        0x6f1c_2a40_0000_4000_8000_0000_0000_0002,
        "Finished Goods",
        "Products ready for sale",
        CategoryType::Export,
    ),
    (
        0x6f1c_2a40_0000_4000_8000_0000_0000_0003,
        "Spare Parts",
        "Replacement parts traded in both directions",
        CategoryType::Both,
    ),
    (
        0x6f1c_2a40_0000_4000_8000_0000_0000_0004,
        "Packaging",
        "Boxes, pallets and wrapping material",
        CategoryType::Import,
    ),
    (
        0x6f1c_2a40_0000_4000_8000_0000_0000_0005,
        "Consumables",
        "Supplies used up in daily operation",
        CategoryType::Both,
    ),
    (
        0x6f1c_2a40_0000_4000_8000_0000_0000_0006,
        "Services",
        "Billable work and service fees",
        CategoryType::Export,
    ),
];

/// The built-in categories. IDs are fixed, so repeated calls return equal values.
#[must_use]
pub fn default_categories() -> Vec<CategoryView> {
    BUILT_IN
        .iter()
        .map(|(id, name, description, category_type)| CategoryView {
            id: Uuid::from_u128(*id),
            name: (*name).to_string(),
            description: Some((*description).to_string()),
            category_type: *category_type,
        })
        .collect()
}

fn fallback(reason: String) -> CategoryListing {
    warn!("Using built-in categories: {}", reason);
    CategoryListing {
        categories: default_categories(),
        source: CategorySource::BuiltIn { reason },
    }
}

/// Lists categories ordered by name, falling back to the built-in set when the store
/// is empty, unreachable or holds rows that cannot be mapped.
pub async fn list_categories(store: &Store) -> CategoryListing {
    let rows = match Category::find()
        .order_by_asc(category::Column::Name)
        .all(store.standard())
        .await
    {
        Ok(rows) => rows,
        Err(e) => return fallback(format!("category query failed: {e}")),
    };

    if rows.is_empty() {
        return fallback("no categories stored".to_string());
    }

    match rows
        .into_iter()
        .map(CategoryView::try_from)
        .collect::<Result<Vec<_>>>()
    {
        Ok(categories) => CategoryListing {
            categories,
            source: CategorySource::Store,
        },
        Err(e) => fallback(e.to_string()),
    }
}

/// Retrieves a stored category by ID.
pub async fn get_category(store: &Store, category_id: Uuid) -> Result<Option<CategoryView>> {
    Category::find_by_id(category_id)
        .one(store.standard())
        .await?
        .map(CategoryView::try_from)
        .transpose()
}

/// Creates a new category.
pub async fn create_category(store: &Store, input: CategoryInput) -> Result<CategoryView> {
    input.validate()?;

    let category = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        description: Set(clean(input.description)),
        category_type: Set(input.category_type.to_string()),
    };
    let row = category.insert(store.standard()).await?;

    info!("Created category '{}'", row.name);
    CategoryView::try_from(row)
}

/// Replaces a category's fields.
pub async fn update_category(
    store: &Store,
    category_id: Uuid,
    input: CategoryInput,
) -> Result<CategoryView> {
    input.validate()?;
    let db = store.standard();

    let mut category: category::ActiveModel = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?
        .into();

    category.name = Set(input.name.trim().to_string());
    category.description = Set(clean(input.description));
    category.category_type = Set(input.category_type.to_string());

    CategoryView::try_from(category.update(db).await?)
}

/// Deletes a category. Products in it are kept and lose their category.
pub async fn delete_category(store: &Store, category_id: Uuid) -> Result<()> {
    let txn = store.standard().begin().await?;

    Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    let detached = Product::update_many()
        .col_expr(product::Column::CategoryId, Expr::value(Option::<Uuid>::None))
        .filter(product::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?;
    Category::delete_by_id(category_id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        "Deleted category {} ({} product(s) detached)",
        category_id, detached.rows_affected
    );
    Ok(())
}

/// Writes the built-in categories that are not stored yet. Uses the elevated tier.
///
/// Returns how many categories were inserted.
pub async fn seed_default_categories(store: &Store) -> Result<usize> {
    let db = store.elevated();
    let mut inserted = 0;

    for default in default_categories() {
        if Category::find_by_id(default.id).one(db).await?.is_some() {
            continue;
        }

        category::ActiveModel {
            id: Set(default.id),
            name: Set(default.name),
            description: Set(default.description),
            category_type: Set(default.category_type.to_string()),
        }
        .insert(db)
        .await?;
        inserted += 1;
    }

    info!("Seeded {} built-in categories", inserted);
    Ok(inserted)
}
