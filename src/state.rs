//! Shared application state for all routes.

use crate::store::ItemStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Pooled store handle; safe for concurrent requests.
    pub store: Arc<dyn ItemStore>,
}

impl AppState {
    pub fn new(store: impl ItemStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
