//! Infrastructure layer: invoice storage, view cache, configuration, and the
//! mutation service that ties them together.

pub mod cache;
pub mod config;
pub mod mutation_service;
pub mod store;

pub use cache::{InvalidationError, ViewCache, ViewInvalidator};
pub use config::{AppConfig, ConfigError, LogFormat};
pub use mutation_service::{InvoiceMutationService, MutationError, MutationOutcome};
pub use store::{InMemoryInvoiceStore, InvoiceStore, PostgresInvoiceStore, StoreError};
