//! Product business logic - Handles all product-related operations.
//!
//! Products are always returned with their category name and type resolved.
//! Deleting a product is refused while invoice lines still reference it.

use crate::{
    core::catalog::{catalog_error, catalog_table_exists},
    entities::{Category, InvoiceItem, PartnerProduct, Product, invoice_item, partner_product, product},
    errors::{Error, Result},
    models::{Product as ProductView, ProductInput},
    store::Store,
};
use chrono::Utc;
use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use tracing::{debug, info};

/// Retrieves all products ordered alphabetically by name.
pub async fn list_products(store: &Store) -> Result<Vec<ProductView>> {
    let rows = Product::find()
        .find_also_related(Category)
        .order_by_asc(product::Column::Name)
        .all(store.standard())
        .await?;
    debug!("Loaded {} product rows", rows.len());

    rows.into_iter()
        .map(|(row, category)| ProductView::from_rows(row, category))
        .collect()
}

/// Retrieves a product by ID.
pub async fn get_product(store: &Store, product_id: Uuid) -> Result<Option<ProductView>> {
    find_product(store.standard(), product_id).await
}

pub(crate) async fn find_product<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
) -> Result<Option<ProductView>> {
    Product::find_by_id(product_id)
        .find_also_related(Category)
        .one(db)
        .await?
        .map(|(row, category)| ProductView::from_rows(row, category))
        .transpose()
}

/// Creates a new product after validating the input.
///
/// # Errors
/// Returns [`Error::Validation`] for a blank name, negative prices or negative stock,
/// and a database error if the insert fails.
pub async fn create_product(store: &Store, input: ProductInput) -> Result<ProductView> {
    let product = insert_product(store.standard(), input).await?;
    info!("Created product '{}' ({})", product.name, product.id);
    Ok(product)
}

pub(crate) async fn insert_product<C: ConnectionTrait>(
    db: &C,
    input: ProductInput,
) -> Result<ProductView> {
    input.validate()?;
    let input = input.normalized();
    let now = Utc::now();

    let product = product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        selling_price: Set(input.selling_price),
        purchase_price: Set(input.purchase_price),
        stock: Set(input.stock),
        image_url: Set(input.image_url),
        category_id: Set(input.category_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let row = product.insert(db).await?;

    find_product(db, row.id)
        .await?
        .ok_or(Error::ProductNotFound { id: row.id })
}

/// Replaces a product's editable fields.
///
/// Invoice lines already written keep their name and price snapshots.
pub async fn update_product(
    store: &Store,
    product_id: Uuid,
    input: ProductInput,
) -> Result<ProductView> {
    input.validate()?;
    let input = input.normalized();
    let db = store.standard();

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.name = Set(input.name);
    product.description = Set(input.description);
    product.selling_price = Set(input.selling_price);
    product.purchase_price = Set(input.purchase_price);
    product.stock = Set(input.stock);
    product.image_url = Set(input.image_url);
    product.category_id = Set(input.category_id);
    product.updated_at = Set(Utc::now());
    product.update(db).await?;

    info!("Updated product {}", product_id);
    find_product(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Changes the stock level by `delta` in a single guarded UPDATE.
///
/// The statement only matches while `stock + delta` stays within `0..=i32::MAX`, so
/// stock can never be driven negative or past the column range, even by concurrent
/// adjustments.
///
/// # Errors
/// - [`Error::InsufficientStock`] if the adjustment would go below zero
/// - [`Error::StockOverflow`] if it would exceed `i32::MAX`
pub async fn adjust_stock(store: &Store, product_id: Uuid, delta: i32) -> Result<ProductView> {
    let db = store.standard();
    let current = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .stock;

    let out_of_range = || {
        if delta < 0 {
            Error::InsufficientStock {
                product_id,
                current,
                delta,
            }
        } else {
            Error::StockOverflow {
                product_id,
                current,
                delta,
            }
        }
    };
    match current.checked_add(delta) {
        Some(next) if next >= 0 => {}
        _ => return Err(out_of_range()),
    }

    let guard = if delta < 0 {
        product::Column::Stock.gte(delta.saturating_neg())
    } else {
        product::Column::Stock.lte(i32::MAX - delta)
    };
    let result = Product::update_many()
        .col_expr(
            product::Column::Stock,
            Expr::col(product::Column::Stock).add(delta),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(product::Column::Id.eq(product_id))
        .filter(guard)
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(out_of_range());
    }

    debug!("Adjusted stock of {} by {}", product_id, delta);
    find_product(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
}

/// Deletes a product together with its partner links.
///
/// Link cleanup is skipped when the store has no `partner_products` table.
///
/// # Errors
/// Returns [`Error::ProductInUse`] when any invoice line references the product.
pub async fn delete_product(store: &Store, product_id: Uuid) -> Result<()> {
    let has_catalog = catalog_table_exists(store.standard()).await?;
    let txn = store.standard().begin().await?;

    Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let line_count = InvoiceItem::find()
        .filter(invoice_item::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    if line_count > 0 {
        return Err(Error::ProductInUse {
            product_id,
            line_count,
        });
    }

    if has_catalog {
        PartnerProduct::delete_many()
            .filter(partner_product::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await
            .map_err(catalog_error)?;
    }
    Product::delete_by_id(product_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted product {}", product_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::{CategoryInput, CategoryType};
    use crate::test_utils::*;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let store = Store::single(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let result = create_product(&store, ProductInput::new("   ", dec!(10))).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = create_product(&store, ProductInput::new("Bolt", dec!(-1))).await;
        let error = result.unwrap_err();
        assert!(error.field_errors().unwrap().contains_key("sellingPrice"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let store = setup_test_db().await?;
        let category = crate::core::category::create_category(
            &store,
            CategoryInput {
                name: "Spare Parts".to_string(),
                description: None,
                category_type: CategoryType::Both,
            },
        )
        .await?;

        let product = create_product(
            &store,
            ProductInput {
                description: Some("  M8 bolt ".to_string()),
                purchase_price: dec!(7.25),
                stock: 40,
                category_id: Some(category.id),
                ..ProductInput::new(" Bolt ", dec!(12.00))
            },
        )
        .await?;

        assert_eq!(product.name, "Bolt");
        assert_eq!(product.description.as_deref(), Some("M8 bolt"));
        assert_eq!(product.selling_price, dec!(12.00));
        assert_eq!(product.purchase_price, dec!(7.25));
        assert_eq!(product.stock, 40);
        assert_eq!(product.category_name.as_deref(), Some("Spare Parts"));
        assert_eq!(product.category_type, Some(CategoryType::Both));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_products_ordered_by_name() -> Result<()> {
        let store = setup_test_db().await?;
        create_test_product(&store, "Washer").await?;
        create_test_product(&store, "Bolt").await?;

        let products = list_products(&store).await?;
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bolt", "Washer"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let store = setup_test_db().await?;
        let product = create_test_product(&store, "Bolt").await?;

        let updated = update_product(
            &store,
            product.id,
            ProductInput {
                stock: 3,
                ..ProductInput::new("Bolt M8", dec!(13.50))
            },
        )
        .await?;
        assert_eq!(updated.name, "Bolt M8");
        assert_eq!(updated.selling_price, dec!(13.50));
        assert_eq!(updated.stock, 3);

        let missing = update_product(&store, Uuid::new_v4(), ProductInput::new("X", dec!(1))).await;
        assert!(matches!(missing, Err(Error::ProductNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_stock_never_goes_negative() -> Result<()> {
        let store = setup_test_db().await?;
        let product = create_custom_product(&store, "Bolt", dec!(1.00), 5).await?;

        let product = adjust_stock(&store, product.id, -3).await?;
        assert_eq!(product.stock, 2);

        let result = adjust_stock(&store, product.id, -3).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientStock {
                current: 2,
                delta: -3,
                ..
            })
        ));

        let product = adjust_stock(&store, product.id, 10).await?;
        assert_eq!(product.stock, 12);

        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_stock_stays_within_column_range() -> Result<()> {
        let store = setup_test_db().await?;
        let full = create_custom_product(&store, "Pallet", dec!(1.00), i32::MAX).await?;
        let other = create_custom_product(&store, "Crate", dec!(1.00), 3).await?;

        let result = adjust_stock(&store, full.id, 1).await;
        assert!(matches!(
            result,
            Err(Error::StockOverflow {
                current: i32::MAX,
                delta: 1,
                ..
            })
        ));

        let result = adjust_stock(&store, other.id, i32::MIN).await;
        assert!(matches!(result, Err(Error::InsufficientStock { .. })));

        // The table is still readable and nothing changed
        let products = list_products(&store).await?;
        assert_eq!(products.len(), 2);
        assert_eq!(get_product(&store, full.id).await?.unwrap().stock, i32::MAX.unsigned_abs());

        let drained = adjust_stock(&store, full.id, -i32::MAX).await?;
        assert_eq!(drained.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_without_link_table() -> Result<()> {
        let store = setup_test_db_without_catalog().await?;
        let product = create_test_product(&store, "Bolt").await?;

        delete_product(&store, product.id).await?;
        assert!(get_product(&store, product.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_removes_links() -> Result<()> {
        let (store, partner, product) = setup_with_partner_and_product().await?;
        crate::core::catalog::link_product(&store, partner.id, product.id, None).await?;

        delete_product(&store, product.id).await?;

        assert!(get_product(&store, product.id).await?.is_none());
        let linked = crate::core::catalog::linked_products(&store, partner.id).await?;
        assert!(linked.is_empty());

        let again = delete_product(&store, product.id).await;
        assert!(matches!(again, Err(Error::ProductNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_refused_while_invoiced() -> Result<()> {
        let (store, partner, product) = setup_with_partner_and_product().await?;
        create_test_invoice(&store, &partner, &product, 1).await?;

        let result = delete_product(&store, product.id).await;
        assert!(matches!(
            result,
            Err(Error::ProductInUse { line_count: 1, .. })
        ));
        assert!(get_product(&store, product.id).await?.is_some());

        Ok(())
    }
}
