//! Invoice totals engine.
//!
//! Pure computation over invoice lines. The header totals of every invoice are
//! produced here and nowhere else.

use crate::models::{InvoiceItem, money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Value-added tax rate applied to every invoice.
pub const TAX_RATE: Decimal = dec!(0.19);

/// Subtotal, tax and grand total of a set of invoice lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Exact sum of the line totals
    pub subtotal: Decimal,
    /// `subtotal * TAX_RATE`, rounded to cents
    pub tax: Decimal,
    /// `subtotal + tax`
    pub total: Decimal,
}

/// Computes invoice totals from its lines.
///
/// The subtotal is the exact sum of line totals. Tax is rounded to cents with
/// midpoint-away-from-zero rounding, so `total` is always a whole number of cents.
#[must_use]
pub fn compute_totals(items: &[InvoiceItem]) -> Totals {
    let subtotal: Decimal = items.iter().map(|item| item.total).sum();
    let tax = money::round_money(subtotal * TAX_RATE);

    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}
