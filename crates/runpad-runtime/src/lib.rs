//! Remote execution for Runpad.
//!
//! This crate turns "run this program" into exactly one observable result:
//! - `ExecutionBackend` - the seam to the remote execution service
//! - `CompilerClient` - the HTTP implementation of that seam
//! - `ExecutionLifecycle` - submits requests and publishes results, making
//!   sure only the latest submission can ever be observed
//!
//! # Example
//!
//! ```ignore
//! use runpad_models::RunSnapshot;
//! use runpad_runtime::{ExecutionLifecycle, RuntimeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lifecycle = ExecutionLifecycle::http(RuntimeConfig::from_env()?)?;
//!
//!     lifecycle.submit(RunSnapshot::new("print(6 * 7)", "py", ""))?;
//!     let result = lifecycle.settled().await;
//!     println!("{:?}", result);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Key Concepts
//!
//! ## Sequence numbers
//!
//! Every submission gets a strictly increasing `RequestSeq`. Earlier
//! requests are never cancelled, but when their responses arrive they are
//! compared against the latest sequence and discarded if superseded. A slow
//! early response therefore cannot overwrite a fast later one.
//!
//! ## Failure mapping
//!
//! Nothing escapes `submit` except `RuntimeError::Disposed`. HTTP errors,
//! transport failures, malformed bodies and remote compile errors all become
//! `ExecutionResult::Failed` with a human-readable message.
//!
//! ## Timeouts
//!
//! None by default: a request stays `Pending` until the transport resolves.
//! `RuntimeConfig::with_request_timeout` opts in to a client-side limit.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod lifecycle;

pub use backend::{resolve, ExecutionBackend};
pub use client::CompilerClient;
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use event::ExecutionEvent;
pub use lifecycle::ExecutionLifecycle;
