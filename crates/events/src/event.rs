use chrono::{DateTime, Utc};

/// A published fact.
///
/// Events are immutable and carry a stable type name so subscribers (SSE
/// clients, log sinks) can route on it without knowing the Rust type.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "view.invalidated").
    fn event_type(&self) -> &'static str;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}
