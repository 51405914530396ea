//! Per-run context
//!
//! Built once in `main` from the parsed global flags and the loaded config,
//! then passed by reference to every command handler.

use crate::api::client::SearchClient;
use crate::core::auth::resolve_auth_headers;
use crate::error::AppError;
use crate::storage::config::{Config, UrlSource};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppContext {
    config: Config,
    api_url_override: Option<String>,
    timeout_override: Option<Duration>,
    debug: bool,
}

impl AppContext {
    pub fn new(
        config: Config,
        api_url_override: Option<String>,
        timeout_override: Option<Duration>,
        debug: bool,
    ) -> Self {
        Self {
            config,
            api_url_override,
            timeout_override,
            debug,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn base_url(&self) -> (String, UrlSource) {
        self.config
            .resolve_base_url(self.api_url_override.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        self.config.resolve_timeout(self.timeout_override)
    }

    /// Build a request client. Fails before any network I/O when no API key
    /// is configured.
    pub fn create_client(&self) -> Result<SearchClient, AppError> {
        let headers = resolve_auth_headers(true)?;
        let (base_url, source) = self.base_url();
        log::debug!("Using Search API at {} (from {})", base_url, source);

        Ok(SearchClient::new(base_url, headers)
            .with_timeout(self.timeout())
            .with_debug(self.debug))
    }
}
