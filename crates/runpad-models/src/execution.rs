//! Execution requests and their observable results.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::RequestSeq;
use crate::wire::CompileRequest;

/// What the user asked to run, captured at the moment of triggering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSnapshot {
    /// Program source. May be empty.
    pub content: String,
    /// Catalog id of the language.
    pub language_id: String,
    /// Text fed to the program's standard input. May be empty.
    pub standard_input: String,
}

impl RunSnapshot {
    /// Creates a snapshot.
    pub fn new(
        content: impl Into<String>,
        language_id: impl Into<String>,
        standard_input: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            language_id: language_id.into(),
            standard_input: standard_input.into(),
        }
    }
}

/// A submitted snapshot tagged with its sequence number.
///
/// Fields are private: a request never changes after it is created, so
/// later edits to the session cannot reach an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRequest {
    sequence: RequestSeq,
    snapshot: RunSnapshot,
    submitted_at: DateTime<Utc>,
}

impl ExecutionRequest {
    /// Tags `snapshot` with `sequence`.
    pub fn new(sequence: RequestSeq, snapshot: RunSnapshot) -> Self {
        Self {
            sequence,
            snapshot,
            submitted_at: Utc::now(),
        }
    }

    /// Sequence number assigned at submission.
    pub fn sequence(&self) -> RequestSeq {
        self.sequence
    }

    /// Program source.
    pub fn content(&self) -> &str {
        &self.snapshot.content
    }

    /// Catalog id of the language.
    pub fn language_id(&self) -> &str {
        &self.snapshot.language_id
    }

    /// Standard input text.
    pub fn standard_input(&self) -> &str {
        &self.snapshot.standard_input
    }

    /// Wall-clock time of submission.
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Builds the payload sent to the remote execution service.
    pub fn to_wire(&self) -> CompileRequest {
        CompileRequest {
            code: self.snapshot.content.clone(),
            language: self.snapshot.language_id.clone(),
            std_input: self.snapshot.standard_input.clone(),
        }
    }
}

/// The externally observable outcome of the latest submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Nothing has been submitted yet.
    #[default]
    Idle,
    /// The latest submission is in flight.
    Pending,
    /// The program ran and produced output.
    Succeeded {
        /// Program output as reported by the service.
        output: String,
    },
    /// The request failed locally, in transport, or remotely.
    Failed {
        /// Human-readable description of the failure.
        message: String,
    },
}

impl ExecutionResult {
    /// Creates a success result.
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self::Succeeded {
            output: output.into(),
        }
    }

    /// Creates a failure result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Returns true while a submission is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    /// Returns the output of a successful run.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Succeeded { output } => Some(output),
            _ => None,
        }
    }

    /// Returns the message of a failed run.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}
