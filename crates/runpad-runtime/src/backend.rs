//! The seam between the lifecycle and the remote execution service.

use async_trait::async_trait;

use runpad_models::{CompileRequest, CompileResponse, ExecutionResult};

use crate::error::Result;

/// Something that can execute a compile request.
///
/// Implementations report transport and protocol problems as `Err`; the
/// lifecycle turns every outcome into an [`ExecutionResult`] via
/// [`resolve`].
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Sends one compile request and waits for the service's answer.
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse>;
}

/// Maps a backend outcome onto the observable result.
pub fn resolve(outcome: Result<CompileResponse>) -> ExecutionResult {
    match outcome {
        Ok(response) => response.into_result(),
        Err(err) => ExecutionResult::failed(err.to_string()),
    }
}
