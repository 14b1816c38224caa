use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use dashboard_core::{Entity, InvoiceId};
use dashboard_invoicing::{Invoice, InvoiceChanges, NewInvoice};

use super::{InvoiceStore, StoreError, sort_for_listing};

/// In-memory invoice table for tests/dev. Ids are UUIDv7 strings.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    rows: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let row = invoice.into_invoice(InvoiceId::generate());
        rows.insert(row.id().clone(), row.clone());
        Ok(row)
    }

    async fn update(&self, id: &InvoiceId, changes: InvoiceChanges) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        match rows.get_mut(id) {
            Some(row) => {
                row.apply_changes(changes);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &InvoiceId) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        Ok(rows.remove(id).map_or(0, |_| 1))
    }

    async fn get(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        let mut out: Vec<Invoice> = rows.values().cloned().collect();
        sort_for_listing(&mut out);
        Ok(out)
    }
}
