//! Events and the pub/sub mechanics used to distribute them.
//!
//! The only event the dashboard publishes today is [`ViewInvalidated`]: a
//! notification that a cached view must be recomputed on its next read.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod invalidation;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use invalidation::ViewInvalidated;
