use serde_json::{json, Value};

use dashboard_invoicing::{Invoice, InvoiceForm};

// -------------------------
// Request mapping
// -------------------------

/// Raw urlencoded pairs as posted by the dashboard's invoice form.
pub fn invoice_form(pairs: Vec<(String, String)>) -> InvoiceForm {
    InvoiceForm::from(pairs)
}

// -------------------------
// Response mapping
// -------------------------

/// `amount` is in cents, `date` is `YYYY-MM-DD`.
pub fn invoice_json(invoice: &Invoice) -> Value {
    json!({
        "id": invoice.id.as_str(),
        "customerId": invoice.customer_id.as_str(),
        "amount": invoice.amount.cents(),
        "status": invoice.status.as_str(),
        "date": invoice.date_string(),
    })
}

pub fn invoice_listing_json(rows: &[Invoice]) -> Value {
    json!({ "items": rows.iter().map(invoice_json).collect::<Vec<_>>() })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use dashboard_core::{CustomerId, InvoiceId};
    use dashboard_invoicing::{AmountCents, InvoiceStatus};

    use super::*;

    #[test]
    fn invoice_json_uses_camel_case_and_cents() {
        let invoice = Invoice {
            id: InvoiceId::new("inv-1"),
            customer_id: CustomerId::new("c1"),
            amount: AmountCents::new(4250),
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };

        assert_eq!(
            invoice_json(&invoice),
            json!({
                "id": "inv-1",
                "customerId": "c1",
                "amount": 4250,
                "status": "pending",
                "date": "2024-05-01",
            })
        );
        assert_eq!(invoice_listing_json(&[invoice])["items"][0]["id"], "inv-1");
    }

    #[test]
    fn repeated_form_keys_keep_first_value() {
        let form = invoice_form(vec![
            ("status".into(), "paid".into()),
            ("status".into(), "pending".into()),
        ]);
        assert_eq!(form.get("status"), Some("paid"));
    }
}
