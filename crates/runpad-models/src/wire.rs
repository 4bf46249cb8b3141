//! JSON payloads exchanged with the remote execution service.

use serde::{Deserialize, Serialize};

use crate::execution::ExecutionResult;

/// Message used when a response carries neither output nor an error.
pub const NO_OUTPUT_MESSAGE: &str = "No output received from the compiler";

/// Body of `POST /api/compiler`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Program source.
    pub code: String,
    /// Catalog id of the language.
    pub language: String,
    /// Standard input for the program.
    pub std_input: String,
}

/// Response of `POST /api/compiler`.
///
/// Every field is optional: older deployments omit `success` and only send
/// `output` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompileResponse {
    /// Whether the service considers the run successful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Program output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Compile or runtime error reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Server-side timestamp, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl CompileResponse {
    /// Creates a successful response.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            output: Some(output.into()),
            ..Self::default()
        }
    }

    /// Creates a failed response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Maps the payload onto an execution result.
    ///
    /// An `error` field always wins. Otherwise `output` is required for
    /// success; `success: false` or a payload with neither key falls back to
    /// [`NO_OUTPUT_MESSAGE`].
    pub fn into_result(self) -> ExecutionResult {
        if let Some(error) = self.error {
            if error.is_empty() {
                return ExecutionResult::failed(NO_OUTPUT_MESSAGE);
            }
            return ExecutionResult::failed(error);
        }

        match (self.success, self.output) {
            (Some(false), _) => ExecutionResult::failed(NO_OUTPUT_MESSAGE),
            (_, Some(output)) => ExecutionResult::succeeded(output),
            (_, None) => ExecutionResult::failed(NO_OUTPUT_MESSAGE),
        }
    }
}
