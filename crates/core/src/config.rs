//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! services. Services never read process-wide environment variables during
//! request handling; the binaries translate the environment into a
//! `CoreConfig` and hand it down.

use crate::error::{CoreError, CoreResult};
use std::time::Duration;

/// Default quiet period before a typed search query is issued remotely.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    store_base_url: String,
    store_api_key: String,
    search_debounce: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(store_base_url: impl Into<String>, store_api_key: impl Into<String>) -> CoreResult<Self> {
        let store_base_url = store_base_url.into();
        let store_api_key = store_api_key.into();

        if store_base_url.trim().is_empty() {
            return Err(CoreError::InvalidInput("store base URL cannot be empty".into()));
        }
        if store_api_key.trim().is_empty() {
            return Err(CoreError::InvalidInput("store API key cannot be empty".into()));
        }

        Ok(Self {
            store_base_url: store_base_url.trim_end_matches('/').to_owned(),
            store_api_key,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        })
    }

    /// Overrides the search debounce quiet period.
    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    pub fn store_base_url(&self) -> &str {
        &self.store_base_url
    }

    pub fn store_api_key(&self) -> &str {
        &self.store_api_key
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce
    }
}
