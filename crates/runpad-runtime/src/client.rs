//! HTTP client for the remote execution service.
//!
//! Speaks the service's JSON protocol:
//! - `POST {base}/api/compiler` with `{ code, language, std_input }`
//! - `GET {base}/api/languages` for the server-side language listing

use async_trait::async_trait;
use tracing::{debug, trace, warn};

use runpad_models::{CompileRequest, CompileResponse};

use crate::backend::ExecutionBackend;
use crate::config::RuntimeConfig;
use crate::error::{describe, Result, RuntimeError};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("runpad/", env!("CARGO_PKG_VERSION"));

/// Client for the remote execution service.
#[derive(Debug, Clone)]
pub struct CompilerClient {
    client: reqwest::Client,
    config: RuntimeConfig,
}

impl CompilerClient {
    /// Create a new client for the given configuration.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RuntimeError::Transport(describe(&e)))?;

        Ok(Self { client, config })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(RuntimeConfig::from_env()?)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// URL of the compile endpoint.
    pub fn compile_url(&self) -> String {
        self.config.endpoint(&self.config.compile_path)
    }

    /// URL of the language listing endpoint.
    pub fn languages_url(&self) -> String {
        self.config.endpoint(&self.config.languages_path)
    }

    /// Send a compile request.
    ///
    /// A non-2xx answer whose body carries an `error` message is returned as
    /// a failed [`CompileResponse`] so the message reaches the user; any
    /// other non-2xx answer becomes [`RuntimeError::Status`].
    pub async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse> {
        let url = self.compile_url();
        debug!(
            url = %url,
            language = %request.language,
            code_len = request.code.len(),
            "sending compile request"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| RuntimeError::Transport(describe(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RuntimeError::Transport(describe(&e)))?;
        trace!(status = %status, body = %body, "compile response");

        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<CompileResponse>(&body) {
                if let Some(error) = parsed.error.filter(|e| !e.is_empty()) {
                    warn!(status = %status, "compile request rejected");
                    return Ok(CompileResponse::err(error));
                }
            }
            warn!(status = %status, "compile request failed");
            return Err(RuntimeError::Status(status));
        }

        serde_json::from_str(&body).map_err(|e| RuntimeError::MalformedResponse(e.to_string()))
    }

    /// Fetch the service's language listing.
    ///
    /// The payload shape is owned by the service, so it is returned as raw
    /// JSON.
    pub async fn languages(&self) -> Result<serde_json::Value> {
        let url = self.languages_url();
        debug!(url = %url, "fetching language listing");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RuntimeError::Transport(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeError::Status(status));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RuntimeError::Transport(describe(&e)))?;
        serde_json::from_str(&body).map_err(|e| RuntimeError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ExecutionBackend for CompilerClient {
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse> {
        CompilerClient::compile(self, request).await
    }
}
