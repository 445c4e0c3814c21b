use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::orchestrator::RecalculationOrchestrator;
use super::repository::VentureRepository;
use crate::scoring::domain::VentureId;

/// Entry points used by collaborators: the post-mutation hook and the scheduled bulk job.
pub struct RecalculationTrigger<R> {
    orchestrator: RecalculationOrchestrator<R>,
}

impl<R> Clone for RecalculationTrigger<R> {
    fn clone(&self) -> Self {
        Self {
            orchestrator: self.orchestrator.clone(),
        }
    }
}

impl<R> RecalculationTrigger<R>
where
    R: VentureRepository + 'static,
{
    pub fn new(orchestrator: RecalculationOrchestrator<R>) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &RecalculationOrchestrator<R> {
        &self.orchestrator
    }

    /// Fire-and-forget recompute of one venture.
    ///
    /// Never blocks and never fails the caller: errors and timeouts are logged, and a recompute
    /// that overruns `trigger_timeout` is abandoned without writing. Returns the spawned task
    /// handle, or `None` when called outside a tokio runtime.
    pub fn trigger_async(&self, id: VentureId) -> Option<JoinHandle<()>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                error!(venture_id = %id, "no async runtime available; recompute not triggered");
                return None;
            }
        };

        let orchestrator = self.orchestrator.clone();
        let timeout = orchestrator.config().trigger_timeout;

        Some(runtime.spawn(async move {
            let outcome = orchestrator.recompute_with_timeout(id.clone(), timeout).await;

            match outcome {
                Ok(fields) => debug!(
                    venture_id = %id,
                    gedsi_score = fields.gedsi_score,
                    "triggered recompute complete"
                ),
                Err(err) => warn!(venture_id = %id, error = %err, "triggered recompute failed"),
            }
        }))
    }

    /// Run the bulk recompute every `interval`, starting immediately.
    pub fn spawn_schedule(&self, interval: Duration) -> JoinHandle<()> {
        let orchestrator = self.orchestrator.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match orchestrator.recompute_all().await {
                    Ok(summary) => info!(
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "scheduled recompute complete"
                    ),
                    Err(err) => error!(error = %err, "scheduled recompute could not start"),
                }
            }
        })
    }
}
