//! Core business logic, independent of any front end.
//!
//! Every service takes a [`crate::store::Store`] by reference and returns typed
//! domain values from [`crate::models`].

/// Partner-specific product links and price overrides
pub mod catalog;
/// Product categories with a built-in fallback set
pub mod category;
/// Invoice drafts, validation and persistence
pub mod invoice;
/// Partner management
pub mod partner;
/// Product management and stock adjustments
pub mod product;
/// Dashboard aggregation
pub mod report;
/// Subtotal, tax and total calculation
pub mod totals;
