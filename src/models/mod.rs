//! Typed domain shapes and the explicit mappings from stored rows.
//!
//! Entities in [`crate::entities`] mirror the store; everything the services hand
//! out is one of these types, converted through a fallible mapping.

pub mod catalog;
pub mod category;
pub mod invoice;
pub mod money;
pub mod partner;
pub mod product;

pub use catalog::{LinkedProduct, PartnerProductLink};
pub use category::{Category, CategoryInput, CategoryType};
pub use invoice::{Invoice, InvoiceItem, InvoiceStatus};
pub use partner::{Partner, PartnerInput};
pub use product::{Product, ProductInput};
