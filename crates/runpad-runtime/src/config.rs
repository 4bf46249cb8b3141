//! Runtime configuration.

use std::time::Duration;

use url::Url;

use crate::error::Result;

/// Configuration for the remote execution client and lifecycle.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Base URL of the remote execution service.
    pub base_url: Url,
    /// Path of the compile endpoint.
    pub compile_path: String,
    /// Path of the language listing endpoint.
    pub languages_path: String,
    /// Client-side request timeout. `None` waits for the transport.
    pub request_timeout: Option<Duration>,
    /// Capacity of the lifecycle event channel.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            // Constant input, checked by test_default_config.
            base_url: runpad_core::parse_api_url(runpad_core::DEFAULT_API_URL)
                .expect("default API URL is valid"),
            compile_path: "/api/compiler".to_string(),
            languages_path: "/api/languages".to_string(),
            request_timeout: None,
            event_capacity: 64,
        }
    }
}

impl RuntimeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config whose base URL comes from `RUNPAD_API_URL`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::default().with_base_url(runpad_core::api_base_url()?))
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = url;
        self
    }

    /// Sets the base URL from a string.
    pub fn with_base_url_str(self, raw: &str) -> Result<Self> {
        Ok(self.with_base_url(runpad_core::parse_api_url(raw)?))
    }

    /// Sets a client-side request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the event channel capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Full URL of an endpoint path under the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
