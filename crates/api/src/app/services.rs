use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use dashboard_core::InvoiceId;
use dashboard_events::{Event, EventBus, InMemoryEventBus, ViewInvalidated};
use dashboard_infra::{
    AppConfig, InMemoryInvoiceStore, InvoiceMutationService, InvoiceStore, PostgresInvoiceStore,
    StoreError, ViewCache,
};
use dashboard_invoicing::Invoice;
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::app::dto;

pub type InvalidationBus = Arc<InMemoryEventBus<ViewInvalidated>>;
pub type ListingCache = Arc<ViewCache<serde_json::Value, InvalidationBus>>;
pub type SharedStore = Arc<dyn InvoiceStore>;
pub type InvoiceService = InvoiceMutationService<SharedStore, ListingCache>;

/// Realtime message broadcasted via SSE.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RealtimeMessage {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Everything a request handler needs.
pub struct AppServices {
    invoices: InvoiceService,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl AppServices {
    /// Wire services around an existing store.
    ///
    /// Must be called inside a Tokio runtime: the bus → SSE bridge runs on a
    /// blocking task.
    pub fn with_store(store: SharedStore, listing_path: impl Into<String>) -> Self {
        let bus: InvalidationBus = Arc::new(InMemoryEventBus::new());
        let cache: ListingCache = Arc::new(ViewCache::new(bus.clone()));

        // Realtime channel (SSE): lossy broadcast.
        let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

        // Background subscriber: bus -> SSE clients. Ends once the bus is dropped.
        {
            let sub = bus.subscribe();
            let realtime_tx = realtime_tx.clone();
            tokio::task::spawn_blocking(move || {
                while let Ok(ev) = sub.recv() {
                    let _ = realtime_tx.send(RealtimeMessage {
                        topic: ev.event_type().to_string(),
                        payload: serde_json::to_value(&ev).unwrap_or(serde_json::Value::Null),
                    });
                }
            });
        }

        let invoices = InvoiceMutationService::new(store, cache).with_listing_path(listing_path);
        Self {
            invoices,
            realtime_tx,
        }
    }

    /// In-memory store (dev/test). Rows are lost on restart.
    pub fn in_memory(listing_path: impl Into<String>) -> Self {
        Self::with_store(Arc::new(InMemoryInvoiceStore::new()), listing_path)
    }

    /// Pick the store from configuration: Postgres when `DATABASE_URL` is
    /// set, otherwise the in-memory store.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        match config.database_url.as_deref() {
            Some(url) => {
                let store = PostgresInvoiceStore::connect(url, config.max_connections).await?;
                store.ensure_table().await?;
                tracing::info!(max_connections = config.max_connections, "using postgres invoice store");
                Ok(Self::with_store(Arc::new(store), config.invoices_path.clone()))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory invoice store");
                Ok(Self::in_memory(config.invoices_path.clone()))
            }
        }
    }

    pub fn invoices(&self) -> &InvoiceService {
        &self.invoices
    }

    pub fn listing_cache(&self) -> &ListingCache {
        self.invoices.invalidator()
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// The listing JSON, served from the view cache until a mutation
    /// invalidates it.
    pub async fn invoice_listing(&self) -> Result<serde_json::Value, StoreError> {
        let store = self.invoices.store();
        self.listing_cache()
            .get_or_try_load(self.invoices.listing_path(), || async move {
                store
                    .list()
                    .await
                    .map(|rows| dto::invoice_listing_json(&rows))
            })
            .await
    }

    pub async fn invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, StoreError> {
        self.invoices.store().get(id).await
    }
}

/// Build the SSE stream of view invalidations (used by `/dashboard/events`).
pub fn invalidation_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(m) => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        // Lagged receivers skip what they missed.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
