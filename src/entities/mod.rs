//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities mirror the stored row shapes; typed domain values live in
//! [`crate::models`].

pub mod category;
pub mod invoice;
pub mod invoice_item;
pub mod partner;
pub mod partner_product;
pub mod product;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use invoice::{Column as InvoiceColumn, Entity as Invoice, Model as InvoiceModel};
pub use invoice_item::{
    Column as InvoiceItemColumn, Entity as InvoiceItem, Model as InvoiceItemModel,
};
pub use partner::{Column as PartnerColumn, Entity as Partner, Model as PartnerModel};
pub use partner_product::{
    Column as PartnerProductColumn, Entity as PartnerProduct, Model as PartnerProductModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
