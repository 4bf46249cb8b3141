//! Lifecycle events.

use runpad_models::{ExecutionResult, RequestSeq};

/// Events emitted by the execution lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionEvent {
    /// A request was submitted and became authoritative.
    Submitted {
        /// Sequence number of the request.
        seq: RequestSeq,
        /// Catalog id of the language.
        language: String,
    },
    /// The latest request resolved and its result was published.
    Completed {
        /// Sequence number of the request.
        seq: RequestSeq,
        /// The published result.
        result: ExecutionResult,
    },
    /// A superseded request resolved and its result was dropped.
    Discarded {
        /// Sequence number of the stale request.
        seq: RequestSeq,
    },
}

impl ExecutionEvent {
    /// Returns the sequence number associated with this event.
    pub fn seq(&self) -> RequestSeq {
        match self {
            ExecutionEvent::Submitted { seq, .. } => *seq,
            ExecutionEvent::Completed { seq, .. } => *seq,
            ExecutionEvent::Discarded { seq } => *seq,
        }
    }

    /// Returns true if this event published a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ExecutionEvent::Completed {
                result: ExecutionResult::Failed { .. },
                ..
            }
        )
    }
}
