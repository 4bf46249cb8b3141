//! The execution request lifecycle.
//!
//! Tracks which submission is authoritative and publishes exactly one
//! observable result at a time. Superseded requests are left to finish but
//! their responses are dropped on arrival.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, watch};
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use runpad_models::{ExecutionRequest, ExecutionResult, RequestSeq, RunSnapshot};

use crate::backend::{resolve, ExecutionBackend};
use crate::client::CompilerClient;
use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::event::ExecutionEvent;

const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Default)]
struct Shared {
    latest: RequestSeq,
    latest_request: Option<ExecutionRequest>,
    disposed: bool,
    in_flight: HashMap<RequestSeq, AbortHandle>,
}

/// Submits run requests and publishes the result of the latest one.
pub struct ExecutionLifecycle {
    backend: Arc<dyn ExecutionBackend>,
    shared: Arc<Mutex<Shared>>,
    result_tx: Arc<watch::Sender<ExecutionResult>>,
    event_tx: broadcast::Sender<ExecutionEvent>,
}

impl fmt::Debug for ExecutionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = lock(&self.shared);
        f.debug_struct("ExecutionLifecycle")
            .field("latest", &shared.latest)
            .field("in_flight", &shared.in_flight.len())
            .field("disposed", &shared.disposed)
            .field("result", &*self.result_tx.borrow())
            .finish()
    }
}

impl ExecutionLifecycle {
    /// Creates a lifecycle over the given backend.
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self::with_capacity(backend, DEFAULT_EVENT_CAPACITY)
    }

    /// Creates a lifecycle with a custom event channel capacity.
    pub fn with_capacity(backend: Arc<dyn ExecutionBackend>, capacity: usize) -> Self {
        let (result_tx, _) = watch::channel(ExecutionResult::Idle);
        let (event_tx, _) = broadcast::channel(capacity.max(1));

        Self {
            backend,
            shared: Arc::new(Mutex::new(Shared::default())),
            result_tx: Arc::new(result_tx),
            event_tx,
        }
    }

    /// Creates a lifecycle that talks to the remote service over HTTP.
    pub fn http(config: RuntimeConfig) -> Result<Self> {
        let capacity = config.event_capacity;
        let client = CompilerClient::new(config)?;
        Ok(Self::with_capacity(Arc::new(client), capacity))
    }

    /// Submits a snapshot for execution.
    ///
    /// The result becomes `Pending` immediately. Must be called from within
    /// a Tokio runtime; the network call runs as a spawned task.
    pub fn submit(&self, snapshot: RunSnapshot) -> Result<RequestSeq> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?;

        let mut shared = lock(&self.shared);
        if shared.disposed {
            return Err(RuntimeError::Disposed);
        }

        let seq = shared.latest.next();
        let request = ExecutionRequest::new(seq, snapshot);
        let wire = request.to_wire();
        shared.latest = seq;
        shared.latest_request = Some(request);

        self.result_tx.send_replace(ExecutionResult::Pending);
        self.emit_event(ExecutionEvent::Submitted {
            seq,
            language: wire.language.clone(),
        });
        debug!(seq = %seq, language = %wire.language, "request submitted");

        let backend = Arc::clone(&self.backend);
        let task_shared = Arc::clone(&self.shared);
        let result_tx = Arc::clone(&self.result_tx);
        let event_tx = self.event_tx.clone();

        // The task cannot complete before its handle is recorded: completion
        // takes the same lock held here.
        let handle = runtime.spawn(async move {
            let result = resolve(backend.compile(&wire).await);
            complete(&task_shared, &result_tx, &event_tx, seq, result);
        });
        shared.in_flight.insert(seq, handle.abort_handle());

        Ok(seq)
    }

    /// The currently observable result.
    pub fn result(&self) -> ExecutionResult {
        self.result_tx.borrow().clone()
    }

    /// Subscribes to result changes.
    pub fn subscribe(&self) -> watch::Receiver<ExecutionResult> {
        self.result_tx.subscribe()
    }

    /// Subscribes to lifecycle events.
    pub fn events(&self) -> broadcast::Receiver<ExecutionEvent> {
        self.event_tx.subscribe()
    }

    /// Sequence number of the authoritative request.
    pub fn latest(&self) -> RequestSeq {
        lock(&self.shared).latest
    }

    /// The authoritative request, if anything has been submitted.
    pub fn latest_request(&self) -> Option<ExecutionRequest> {
        lock(&self.shared).latest_request.clone()
    }

    /// Number of requests whose responses have not arrived yet.
    pub fn in_flight(&self) -> usize {
        lock(&self.shared).in_flight.len()
    }

    /// Returns true once [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        lock(&self.shared).disposed
    }

    /// Waits until the observable result is no longer `Pending`.
    ///
    /// Returns the current result immediately if nothing is pending, and
    /// returns early if the lifecycle is disposed while waiting.
    pub async fn settled(&self) -> ExecutionResult {
        let mut rx = self.result_tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if !current.is_pending() || self.is_disposed() {
                return current;
            }
            if rx.changed().await.is_err() {
                return self.result();
            }
        }
    }

    /// Stops publishing results.
    ///
    /// In-flight requests are aborted and any response that still arrives is
    /// ignored. Further submissions fail with [`RuntimeError::Disposed`].
    pub fn dispose(&self) {
        let mut shared = lock(&self.shared);
        if shared.disposed {
            return;
        }
        shared.disposed = true;

        let aborted = shared.in_flight.len();
        for (_, handle) in shared.in_flight.drain() {
            handle.abort();
        }
        drop(shared);

        // Wake `settled` waiters without changing the value.
        self.result_tx.send_modify(|_| {});
        info!(aborted, "execution lifecycle disposed");
    }

    fn emit_event(&self, event: ExecutionEvent) {
        // Ignore send errors (no receivers)
        let _ = self.event_tx.send(event);
    }
}

impl Drop for ExecutionLifecycle {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn complete(
    shared: &Mutex<Shared>,
    result_tx: &watch::Sender<ExecutionResult>,
    event_tx: &broadcast::Sender<ExecutionEvent>,
    seq: RequestSeq,
    result: ExecutionResult,
) {
    let mut shared = lock(shared);
    shared.in_flight.remove(&seq);

    if shared.disposed {
        debug!(seq = %seq, "response arrived after dispose");
        return;
    }

    if seq != shared.latest {
        debug!(seq = %seq, latest = %shared.latest, "discarding stale response");
        let _ = event_tx.send(ExecutionEvent::Discarded { seq });
        return;
    }

    if let Some(message) = result.error_message() {
        warn!(seq = %seq, error = %message, "execution failed");
    } else {
        debug!(seq = %seq, "execution succeeded");
    }
    result_tx.send_replace(result.clone());
    let _ = event_tx.send(ExecutionEvent::Completed { seq, result });
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}
