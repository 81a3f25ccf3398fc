use std::sync::Arc;

use tokio::sync::RwLock;
use warden_core::store::UserStore;

/// Shared handler state. The store is the only durable resource, and
/// `save` fully overwrites it, so concurrent mutating requests would
/// race load-modify-write and lose updates. `guard` serializes them:
/// mutating handlers hold the write half across the entire
/// load-transform-save sequence; read-only handlers take the read half,
/// which only excludes writers.
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub guard: RwLock<()>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            guard: RwLock::new(()),
        })
    }
}
