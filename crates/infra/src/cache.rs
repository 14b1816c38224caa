//! Cached view output, keyed by view path.
//!
//! A mutation calls [`ViewInvalidator::invalidate`] with the path of the view
//! it made stale. [`ViewCache`] drops its local copy synchronously and then
//! publishes [`ViewInvalidated`] so every other subscriber hears about it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use dashboard_events::{EventBus, ViewInvalidated};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidationError {
    #[error("failed to publish invalidation of {path}: {reason}")]
    Publish { path: String, reason: String },
}

/// "The view at `path` is stale; recompute it on next read."
pub trait ViewInvalidator: Send + Sync {
    fn invalidate(&self, path: &str) -> Result<(), InvalidationError>;
}

impl<T> ViewInvalidator for Arc<T>
where
    T: ViewInvalidator + ?Sized,
{
    fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        (**self).invalidate(path)
    }
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, V>,
    /// Bumped on every invalidation so a load that raced with a mutation
    /// cannot store its stale result.
    generations: HashMap<String, u64>,
}

impl<V> Default for CacheState<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            generations: HashMap::new(),
        }
    }
}

impl<V> CacheState<V> {
    fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).copied().unwrap_or(0)
    }
}

/// Path-keyed cache of rendered views.
#[derive(Debug)]
pub struct ViewCache<V, B> {
    state: RwLock<CacheState<V>>,
    bus: B,
}

impl<V, B> ViewCache<V, B>
where
    V: Clone,
{
    pub fn new(bus: B) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            bus,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn get(&self, path: &str) -> Option<V> {
        self.state.read().ok()?.entries.get(path).cloned()
    }

    /// Serve `path` from the cache, or run `load` and cache its result.
    ///
    /// A result is only cached if no invalidation of `path` happened while
    /// `load` was running. Load errors are returned and nothing is cached.
    pub async fn get_or_try_load<F, Fut, E>(&self, path: &str, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(path) {
            return Ok(hit);
        }
        let generation = self.state.read().ok().map(|state| state.generation(path));

        let value = load().await?;

        if let (Some(seen), Ok(mut state)) = (generation, self.state.write()) {
            if state.generation(path) == seen {
                state.entries.insert(path.to_string(), value.clone());
            }
        }
        Ok(value)
    }

    fn drop_local(&self, path: &str) {
        if let Ok(mut state) = self.state.write() {
            state.entries.remove(path);
            *state.generations.entry(path.to_string()).or_insert(0) += 1;
        }
    }
}

impl<V, B> ViewInvalidator for ViewCache<V, B>
where
    V: Clone + Send + Sync,
    B: EventBus<ViewInvalidated>,
{
    fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        self.drop_local(path);
        tracing::debug!(path, "view invalidated");

        self.bus
            .publish(ViewInvalidated::now(path))
            .map_err(|e| InvalidationError::Publish {
                path: path.to_string(),
                reason: format!("{e:?}"),
            })
    }
}
