//! Validation schemas for invoice mutations.
//!
//! Every field is checked and every failure is reported; a schema never stops
//! at the first bad field.

use dashboard_core::{CustomerId, InvoiceId, ValidationErrors};

use crate::amount::AmountCents;
use crate::form::{InvoiceForm, fields};
use crate::invoice::InvoiceStatus;

/// An empty id. The id comes from the URL path, never from the form.
const REQUIRED: &str = "Required";

/// A form field that was not submitted reads as null.
const CUSTOMER_ID_MISSING: &str = "Expected string, received null";
const STATUS_MISSING: &str = "Expected 'pending' | 'paid', received null";

/// The client-controlled invoice fields after validation and coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

/// Schema for creating an invoice: `customerId`, `amount`, `status`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateInvoiceSchema;

impl CreateInvoiceSchema {
    pub fn parse(form: &InvoiceForm) -> Result<InvoiceFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match parse_fields(form, &mut errors) {
            Some(fields) => errors.into_result(fields),
            None => Err(errors),
        }
    }
}

/// Schema for updating an invoice: the create fields plus a non-empty id.
///
/// The id travels out-of-band (URL path), not in the form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateInvoiceSchema;

impl UpdateInvoiceSchema {
    pub fn parse(id: &str, form: &InvoiceForm) -> Result<(InvoiceId, InvoiceFields), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let id = match id.parse::<InvoiceId>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(fields::ID, REQUIRED);
                None
            }
        };
        let parsed = parse_fields(form, &mut errors);

        match (id, parsed) {
            (Some(id), Some(fields)) => errors.into_result((id, fields)),
            _ => Err(errors),
        }
    }
}

fn parse_fields(form: &InvoiceForm, errors: &mut ValidationErrors) -> Option<InvoiceFields> {
    let customer_id = match form.get(fields::CUSTOMER_ID) {
        Some(raw) => Some(CustomerId::new(raw)),
        None => {
            errors.push(fields::CUSTOMER_ID, CUSTOMER_ID_MISSING);
            None
        }
    };

    let amount = match AmountCents::coerce(form.get(fields::AMOUNT)) {
        Ok(amount) => Some(amount),
        Err(e) => {
            errors.push(fields::AMOUNT, e.message());
            None
        }
    };

    let status = match form.get(fields::STATUS) {
        None => {
            errors.push(fields::STATUS, STATUS_MISSING);
            None
        }
        Some(raw) => match InvoiceStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                errors.push(
                    fields::STATUS,
                    format!("Invalid enum value. Expected 'pending' | 'paid', received '{raw}'"),
                );
                None
            }
        },
    };

    Some(InvoiceFields {
        customer_id: customer_id?,
        amount: amount?,
        status: status?,
    })
}
