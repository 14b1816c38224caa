use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// The cached output of the view at `path` is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewInvalidated {
    pub path: String,
    pub occurred_at: DateTime<Utc>,
}

impl ViewInvalidated {
    pub const EVENT_TYPE: &'static str = "view.invalidated";

    pub fn new(path: impl Into<String>, occurred_at: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            occurred_at,
        }
    }

    /// Stamp with the current time.
    pub fn now(path: impl Into<String>) -> Self {
        Self::new(path, Utc::now())
    }
}

impl Event for ViewInvalidated {
    fn event_type(&self) -> &'static str {
        Self::EVENT_TYPE
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_path_and_timestamp() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ev = ViewInvalidated::new("/dashboard/invoices", at);

        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["path"], "/dashboard/invoices");
        assert_eq!(json["occurred_at"], "2024-05-01T12:00:00Z");
        assert_eq!(ev.event_type(), "view.invalidated");
    }
}
