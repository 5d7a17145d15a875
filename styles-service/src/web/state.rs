//! Shared application state

use std::sync::Arc;

use crate::store::StyleStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Backing store for examples and element styles
    pub store: Arc<dyn StyleStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn StyleStore>) -> Self {
        Self { store }
    }
}
