//! Application state for the web layer.

use std::sync::Arc;

use crate::service::RouteService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route queries, ingestion and bookings
    pub service: Arc<RouteService>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: Arc<RouteService>) -> Self {
        Self { service }
    }
}
