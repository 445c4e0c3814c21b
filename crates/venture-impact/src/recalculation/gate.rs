use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::RecalculationError;
use crate::scoring::domain::{MaterializedMetrics, VentureId};

const OPEN: u8 = 0;
const COMMITTED: u8 = 1;
const EXPIRED: u8 = 2;

/// One-shot decision between a recompute worker and the caller waiting on it.
///
/// Whichever side claims the gate first wins: a worker that commits may persist, and a
/// waiter that expires the gate reports a timeout knowing nothing will be written later.
#[derive(Debug)]
pub(crate) struct WriteGate {
    state: AtomicU8,
    budget: Duration,
}

impl WriteGate {
    pub fn new(budget: Duration) -> Self {
        Self {
            state: AtomicU8::new(OPEN),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Claimed by the worker immediately before persisting.
    pub fn try_commit(&self) -> bool {
        self.claim(COMMITTED)
    }

    /// Claimed by the waiter once its budget has elapsed.
    pub fn try_expire(&self) -> bool {
        self.claim(EXPIRED)
    }

    pub fn is_expired(&self) -> bool {
        self.state.load(Ordering::Acquire) == EXPIRED
    }

    fn claim(&self, next: u8) -> bool {
        self.state
            .compare_exchange(OPEN, next, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn timed_out(&self, id: &VentureId) -> RecalculationError {
        RecalculationError::TimedOut {
            id: id.clone(),
            timeout: self.budget,
        }
    }
}

/// Wait for a gated blocking recompute for at most the gate's budget.
///
/// If the worker already committed its write when the budget runs out, the write is awaited
/// so the reported outcome matches what was stored.
pub(crate) async fn await_gated(
    id: &VentureId,
    mut handle: JoinHandle<Result<MaterializedMetrics, RecalculationError>>,
    gate: &WriteGate,
) -> Result<MaterializedMetrics, RecalculationError> {
    match tokio::time::timeout(gate.budget(), &mut handle).await {
        Ok(joined) => flatten(id, joined),
        Err(_) if gate.try_expire() => Err(gate.timed_out(id)),
        Err(_) => flatten(id, handle.await),
    }
}

fn flatten(
    id: &VentureId,
    joined: Result<Result<MaterializedMetrics, RecalculationError>, tokio::task::JoinError>,
) -> Result<MaterializedMetrics, RecalculationError> {
    joined.unwrap_or_else(|join| {
        Err(RecalculationError::TaskAborted {
            id: id.clone(),
            detail: join.to_string(),
        })
    })
}
