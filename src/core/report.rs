//! Dashboard report generation.
//!
//! Aggregates counts and invoice amounts for the overview screen. All functions
//! return structured data; formatting is left to the caller.

use crate::{
    config::settings::DashboardSettings,
    core::product::list_products,
    entities::{Invoice, Partner, invoice},
    errors::Result,
    models::{InvoiceStatus, Product, invoice::parse_status},
    store::Store,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{PaginatorTrait, QueryOrder, prelude::*};
use serde::Serialize;

/// Invoice counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Invoices still being prepared
    pub draft: u64,
    /// Invoices sent and awaiting payment
    pub sent: u64,
    /// Invoices paid in full
    pub paid: u64,
}

/// A compact invoice row for the "recent invoices" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOverview {
    /// Invoice ID
    pub id: Uuid,
    /// Partner name as written on the invoice
    pub partner_name: String,
    /// Invoice date
    pub date: NaiveDate,
    /// Gross total
    pub total: Decimal,
    /// Current status
    pub status: InvoiceStatus,
}

/// Everything shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Number of stored products
    pub product_count: usize,
    /// Number of stored partners
    pub partner_count: u64,
    /// Invoice counts per status
    pub invoices: StatusCounts,
    /// Sum of totals of sent, unpaid invoices
    pub open_amount: Decimal,
    /// Sum of totals of paid invoices
    pub revenue: Decimal,
    /// Products at or below the low-stock threshold, lowest stock first
    pub low_stock: Vec<Product>,
    /// Newest invoices first, up to the configured limit
    pub recent_invoices: Vec<InvoiceOverview>,
}

/// Builds the dashboard summary.
pub async fn dashboard_summary(
    store: &Store,
    settings: &DashboardSettings,
) -> Result<DashboardSummary> {
    let db = store.standard();
    let products = list_products(store).await?;
    let partner_count = Partner::find().count(db).await?;

    let headers = Invoice::find()
        .order_by_desc(invoice::Column::Date)
        .order_by_desc(invoice::Column::CreatedAt)
        .all(db)
        .await?;

    let mut invoices = StatusCounts::default();
    let mut open_amount = Decimal::ZERO;
    let mut revenue = Decimal::ZERO;
    let mut recent_invoices = Vec::with_capacity(settings.recent_invoice_limit);

    for header in headers {
        let status = parse_status(&header.status)?;
        let total = header.total;
        match status {
            InvoiceStatus::Draft => invoices.draft += 1,
            InvoiceStatus::Sent => {
                invoices.sent += 1;
                open_amount += total;
            }
            InvoiceStatus::Paid => {
                invoices.paid += 1;
                revenue += total;
            }
        }

        if recent_invoices.len() < settings.recent_invoice_limit {
            recent_invoices.push(InvoiceOverview {
                id: header.id,
                partner_name: header.partner_name,
                date: header.date,
                total,
                status,
            });
        }
    }

    let product_count = products.len();
    let mut low_stock: Vec<Product> = products
        .into_iter()
        .filter(|p| p.stock <= settings.low_stock_threshold)
        .collect();
    low_stock.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));

    Ok(DashboardSummary {
        product_count,
        partner_count,
        invoices,
        open_amount,
        revenue,
        low_stock,
        recent_invoices,
    })
}

/// Gross margin of a product as a percentage of its selling price.
///
/// Returns `None` when the selling price is zero.
#[must_use]
pub fn margin_percent(product: &Product) -> Option<Decimal> {
    if product.selling_price.is_zero() {
        return None;
    }
    let margin = (product.selling_price - product.purchase_price) / product.selling_price;
    Some((margin * Decimal::ONE_HUNDRED).round_dp(1))
}
