//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extraction::CompletionProvider;
use crate::store::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: DocumentStore,
    provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    /// Create a new application state with the given completion provider.
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        let store = DocumentStore::new(config.registry.max_documents);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                provider,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the document registry
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Get the completion provider
    pub fn provider(&self) -> &dyn CompletionProvider {
        self.inner.provider.as_ref()
    }
}
