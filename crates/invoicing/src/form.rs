//! Raw form submissions.

use std::collections::HashMap;

/// Wire names of the submitted fields.
pub mod fields {
    pub const ID: &str = "id";
    pub const CUSTOMER_ID: &str = "customerId";
    pub const AMOUNT: &str = "amount";
    pub const STATUS: &str = "status";
}

/// Unvalidated key/value pairs from a form submission.
///
/// When a key is submitted more than once the first value wins, like a
/// browser's `FormData.get`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceForm {
    values: HashMap<String, String>,
}

impl InvoiceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values = HashMap::new();
        for (k, v) in pairs {
            values.entry(k.into()).or_insert_with(|| v.into());
        }
        Self { values }
    }

    /// Builder-style insert. Keeps an existing value for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.entry(key.into()).or_insert_with(|| value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl From<HashMap<String, String>> for InvoiceForm {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl From<Vec<(String, String)>> for InvoiceForm {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::from_pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let form = InvoiceForm::from_pairs([("status", "paid"), ("status", "pending")]);
        assert_eq!(form.get("status"), Some("paid"));
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(InvoiceForm::new().with("amount", "1").get("customerId"), None);
    }
}
