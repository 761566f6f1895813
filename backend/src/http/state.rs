//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::{CoverageSettings, ServerConfig};

/// Shared application state passed to all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Per-request defaults and limits.
    pub fn coverage_settings(&self) -> &CoverageSettings {
        &self.config.coverage
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
