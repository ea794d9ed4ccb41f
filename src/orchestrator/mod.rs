//! Orchestration layer.
//!
//! `runner` fans acquisition tasks out across a bounded worker pool and
//! merges the results; `enrich` is the separate, deliberately sequential
//! pass that adds per-match detailed statistics. Only this layer creates
//! and disposes of browser sessions.

pub mod enrich;
pub mod runner;

pub use enrich::enrich_records;
pub use runner::TaskOrchestrator;

use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::browser::Session;

/// Bound on the close handshake of a discarded session.
const CLOSE_BUDGET: Duration = Duration::from_secs(10);

/// Dispose of a session without blocking the caller.
///
/// A wedged browser can stall its own close handshake, so the close runs
/// detached and bounded; on expiry the half-closed session is dropped,
/// which kills the child process. The worker slot frees immediately.
pub(crate) fn discard_session<S: Session + 'static>(session: S) {
    tokio::spawn(async move {
        if timeout(CLOSE_BUDGET, Box::new(session).close()).await.is_err() {
            warn!("session close stalled past {:?}, dropping it", CLOSE_BUDGET);
        }
    });
}
