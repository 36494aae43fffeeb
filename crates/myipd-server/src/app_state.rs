// ABOUTME: Shared application state for the myipd HTTP server.
// ABOUTME: Holds the configuration, the reloadable token and extras stores, and the address lookup.

use std::sync::Arc;

use myipd_store::{ExtrasStore, TokenStore};

use crate::config::ServerConfig;
use crate::resolver::{AddressLookup, HttpLookup, LookupError};

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub tokens: TokenStore,
    pub extras: ExtrasStore,
    pub lookup: Arc<dyn AddressLookup>,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create state with empty stores for the configured files. Call
    /// `load_stores` before serving.
    pub fn new(config: ServerConfig, lookup: Arc<dyn AddressLookup>) -> Self {
        let tokens = TokenStore::new(config.tokens_file.clone());
        let extras = ExtrasStore::new(config.extras_file.clone());
        Self {
            config,
            tokens,
            extras,
            lookup,
        }
    }

    /// Create state that looks addresses up over HTTP using the configured
    /// sources and timeout.
    pub fn with_http_lookup(config: ServerConfig) -> Result<Self, LookupError> {
        let lookup = HttpLookup::from_config(&config)?;
        Ok(Self::new(config, Arc::new(lookup)))
    }

    /// Initial load of both stores. Read failures are logged and leave the
    /// affected store empty; they never stop the server.
    pub async fn load_stores(&self) {
        match self.tokens.reload().await {
            Ok(count) => tracing::info!(
                path = %self.tokens.path().display(),
                "loaded {} token(s)",
                count
            ),
            Err(e) => tracing::error!("{}; all requests will be refused until a reload succeeds", e),
        }

        if let Some(path) = self.extras.path() {
            match self.extras.reload().await {
                Ok(count) => {
                    tracing::info!(path = %path.display(), "loaded {} extra address(es)", count)
                }
                Err(e) => tracing::error!("{}", e),
            }
        }
    }
}
