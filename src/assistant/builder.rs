//! Builder for configuring assistant instances.

use std::path::PathBuf;
use std::sync::Arc;

use super::Assistant;
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::providers::{ChatProvider, FallbackChain, OpenRouterClient};
use crate::Result;

/// Main entry point for creating assistant instances.
pub struct Aniki;

impl Aniki {
    /// Create a new builder for configuring the assistant.
    pub fn builder() -> AnikiBuilder {
        AnikiBuilder::new()
    }
}

/// Builder for configuring assistant instances.
///
/// ```rust,no_run
/// use aniki::{Aniki, Config};
///
/// # fn main() -> aniki::Result<()> {
/// let assistant = Aniki::builder()
///     .config(Config::from_env()?)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct AnikiBuilder {
    config: Option<Config>,
    provider: Option<Arc<dyn ChatProvider>>,
    cache_path: Option<PathBuf>,
}

impl AnikiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit configuration instead of reading the environment.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject a custom chat provider (tests, alternative gateways).
    pub fn provider(mut self, provider: Arc<dyn ChatProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Override the cache file location.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Validate configuration and assemble the assistant.
    ///
    /// Missing credentials fail here, at startup, never per-request.
    pub fn build(self) -> Result<Assistant> {
        let config = match self.config {
            Some(config) => config,
            None => Config::from_env()?,
        };
        config.validate()?;

        let provider: Arc<dyn ChatProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(OpenRouterClient::new(&config.api_key)),
        };
        let chain = FallbackChain::new(
            provider,
            &config.model,
            config.max_retries,
            config.retry_base_delay,
        );

        let cache = match self.cache_path {
            Some(path) => ResponseCache::with_path(path, config.cache_ttl_hours),
            None => ResponseCache::new(&config),
        };

        Ok(Assistant::new(
            chain,
            cache,
            config.max_reply_len,
            config.request_timeout,
        ))
    }
}
