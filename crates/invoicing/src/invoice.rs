use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use dashboard_core::{CustomerId, Entity, InvoiceId};

use crate::amount::AmountCents;
use crate::schema::InvoiceFields;

/// Path of the invoice-listing view. Mutations invalidate it and redirect to it.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Persisted format of [`Invoice::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Invoice status. A flat enumeration: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Exact, case-sensitive match on the wire name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `invoices` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
    /// Calendar date the invoice was created (UTC). Never changed by updates.
    pub date: NaiveDate,
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Invoice {
    /// Overwrite the mutable fields. `id` and `date` are left as they are.
    pub fn apply_changes(&mut self, changes: InvoiceChanges) {
        self.customer_id = changes.customer_id;
        self.amount = changes.amount;
        self.status = changes.status;
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// A validated invoice that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    /// Stamp validated fields with the UTC calendar date of `occurred_at`.
    pub fn from_fields(fields: InvoiceFields, occurred_at: DateTime<Utc>) -> Self {
        Self {
            customer_id: fields.customer_id,
            amount: fields.amount,
            status: fields.status,
            date: occurred_at.date_naive(),
        }
    }

    pub fn into_invoice(self, id: InvoiceId) -> Invoice {
        Invoice {
            id,
            customer_id: self.customer_id,
            amount: self.amount,
            status: self.status,
            date: self.date,
        }
    }
}

/// The fields an update overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

impl From<InvoiceFields> for InvoiceChanges {
    fn from(fields: InvoiceFields) -> Self {
        Self {
            customer_id: fields.customer_id,
            amount: fields.amount,
            status: fields.status,
        }
    }
}

/// Parse a persisted `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
}
