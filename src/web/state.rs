//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::search::SearchGateway;
use crate::vendors::VendorAdapter;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search gateway guarding the vendor call
    pub gateway: Arc<SearchGateway>,
    /// Process-wide counters
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state around a vendor adapter
    pub fn new(settings: Settings, vendor: Arc<dyn VendorAdapter>) -> Self {
        let settings = Arc::new(settings);
        let metrics = Arc::new(Metrics::new());
        let gateway = Arc::new(SearchGateway::new(vendor, &settings, metrics.clone()));

        Self {
            settings,
            gateway,
            metrics,
        }
    }
}
