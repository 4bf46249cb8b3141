//! Core data models for Runpad.
//!
//! This crate provides the fundamental data types shared by the editor
//! session, the execution lifecycle and the CLI: the static language
//! catalog, execution snapshots and results, and the wire types exchanged
//! with the remote execution service.

pub mod execution;
pub mod ids;
pub mod language;
pub mod wire;

// Re-export main types
pub use execution::{ExecutionRequest, ExecutionResult, RunSnapshot};
pub use ids::{RequestSeq, SessionId};
pub use language::{LanguageOption, DEFAULT_LANGUAGE, LANGUAGES};
pub use wire::{CompileRequest, CompileResponse, NO_OUTPUT_MESSAGE};
