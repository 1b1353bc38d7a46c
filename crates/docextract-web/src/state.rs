use std::sync::Arc;

use docextract_core::Extractor;

use crate::config::ServerConfig;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(config: ServerConfig, extractor: Extractor) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
        }
    }
}
