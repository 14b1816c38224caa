//! Invoice persistence.
//!
//! One trait, two backends: [`InMemoryInvoiceStore`] for tests/dev and
//! [`PostgresInvoiceStore`] for the `invoices` table. Every mutation is a
//! single auto-committed statement; there are no multi-statement transactions.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use dashboard_core::InvoiceId;
use dashboard_invoicing::{Invoice, InvoiceChanges, NewInvoice};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;

/// Persistence failure. Transient and permanent failures are not told apart.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached (pool closed, IO, lock poisoned).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The statement was rejected (constraint violation, bad SQL, ...).
    #[error("query failed: {0}")]
    Query(String),

    /// A row came back in a shape we cannot read.
    #[error("failed to decode row: {0}")]
    Decode(String),
}

/// Storage for invoice rows.
///
/// `update` and `delete` return the number of rows affected. Zero is not an
/// error: touching an id that does not exist is a no-op.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a row; the store assigns its id.
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StoreError>;

    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError>;

    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError>;

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError>;

    /// All rows, newest `date` first (ties broken by id, descending).
    async fn list(&self) -> Result<Vec<Invoice>, StoreError>;
}

#[async_trait]
impl<S> InvoiceStore for Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        (**self).insert(invoice).await
    }

    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError> {
        (**self).delete(id).await
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        (**self).list().await
    }
}

/// Listing order shared by every backend.
pub(crate) fn sort_for_listing(rows: &mut [Invoice]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}
