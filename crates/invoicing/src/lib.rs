//! Invoicing domain module.
//!
//! Business rules for dashboard invoices: field validation, amount
//! coercion to minor units, and the row model. Pure logic only (no IO, no
//! HTTP, no storage).

pub mod amount;
pub mod form;
pub mod invoice;
pub mod schema;

pub use amount::{AmountCents, AmountError};
pub use form::InvoiceForm;
pub use invoice::{
    DATE_FORMAT, INVOICES_PATH, Invoice, InvoiceChanges, InvoiceStatus, NewInvoice, parse_date,
};
pub use schema::{CreateInvoiceSchema, InvoiceFields, UpdateInvoiceSchema};
