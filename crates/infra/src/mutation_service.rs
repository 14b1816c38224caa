//! Invoice mutations (application-level orchestration).
//!
//! Every operation is the same straight line:
//!
//! ```text
//! form input
//!   ↓
//! 1. Validate (schema; failure stops here, nothing is written)
//!   ↓
//! 2. Derive (amount → cents, date → today)
//!   ↓
//! 3. Write (one statement against the store)
//!   ↓
//! 4. Invalidate the listing view (failure is logged, not returned)
//!   ↓
//! 5. Return the outcome (redirect target for create/update)
//! ```
//!
//! Navigation is not performed here: the caller gets a [`MutationOutcome`]
//! and decides what to do with it. There are no retries and no compensating
//! actions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use dashboard_core::{InvoiceId, ValidationErrors};
use dashboard_invoicing::{
    CreateInvoiceSchema, INVOICES_PATH, InvoiceChanges, InvoiceForm, NewInvoice, UpdateInvoiceSchema,
};

use crate::cache::ViewInvalidator;
use crate::store::{InvoiceStore, StoreError};

/// What the caller should do after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MutationOutcome {
    /// Navigate to `target`.
    Redirected { target: String },
    /// Stay where you are; the invalidated view refreshes on its next read.
    #[serde(rename = "ok")]
    Completed,
}

#[derive(Debug, Error)]
pub enum MutationError {
    /// Input rejected before any write.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// The write itself failed.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl From<ValidationErrors> for MutationError {
    fn from(value: ValidationErrors) -> Self {
        MutationError::Validation(value)
    }
}

/// Create/update/delete for invoice rows.
///
/// - `S`: where rows live
/// - `I`: who gets told the listing view is stale
#[derive(Debug)]
pub struct InvoiceMutationService<S, I> {
    store: S,
    invalidator: I,
    listing_path: String,
}

impl<S, I> InvoiceMutationService<S, I> {
    pub fn new(store: S, invalidator: I) -> Self {
        Self {
            store,
            invalidator,
            listing_path: INVOICES_PATH.to_string(),
        }
    }

    pub fn with_listing_path(mut self, path: impl Into<String>) -> Self {
        self.listing_path = path.into();
        self
    }

    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn invalidator(&self) -> &I {
        &self.invalidator
    }
}

impl<S, I> InvoiceMutationService<S, I>
where
    S: InvoiceStore,
    I: ViewInvalidator,
{
    /// Validate `form`, insert a new row dated `occurred_at` (UTC), and point
    /// the caller at the listing.
    pub async fn create_invoice(
        &self,
        form: &InvoiceForm,
        occurred_at: DateTime<Utc>,
    ) -> Result<MutationOutcome, MutationError> {
        let fields = CreateInvoiceSchema::parse(form)?;
        let new = NewInvoice::from_fields(fields, occurred_at);

        let row = self.store.insert(new).await?;
        tracing::info!(
            invoice_id = %row.id,
            customer_id = %row.customer_id,
            amount_cents = row.amount.cents(),
            status = %row.status,
            date = %row.date_string(),
            "invoice created"
        );

        self.invalidate_listing();
        Ok(self.redirect_to_listing())
    }

    /// Overwrite customer, amount and status of `id`. The creation date is
    /// kept. An unknown id writes nothing and is not an error.
    pub async fn update_invoice(
        &self,
        id: &str,
        form: &InvoiceForm,
    ) -> Result<MutationOutcome, MutationError> {
        let (id, fields) = UpdateInvoiceSchema::parse(id, form)?;

        let rows = self.store.update(&id, InvoiceChanges::from(fields)).await?;
        tracing::info!(invoice_id = %id, rows_affected = rows, "invoice updated");

        self.invalidate_listing();
        Ok(self.redirect_to_listing())
    }

    /// Remove `id`. An unknown id removes nothing and is not an error.
    pub async fn delete_invoice(&self, id: &InvoiceId) -> Result<MutationOutcome, MutationError> {
        let rows = self.store.delete(id).await?;
        tracing::info!(invoice_id = %id, rows_affected = rows, "invoice deleted");

        self.invalidate_listing();
        Ok(MutationOutcome::Completed)
    }

    fn invalidate_listing(&self) {
        if let Err(e) = self.invalidator.invalidate(&self.listing_path) {
            tracing::warn!(path = %self.listing_path, "listing invalidation failed: {e}");
        }
    }

    fn redirect_to_listing(&self) -> MutationOutcome {
        MutationOutcome::Redirected {
            target: self.listing_path.clone(),
        }
    }
}
