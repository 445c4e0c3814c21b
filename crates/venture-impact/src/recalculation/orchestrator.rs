use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use super::gate::{await_gated, WriteGate};
use super::locks::EntityLocks;
use super::repository::{RepositoryError, VentureRepository};
use super::RecalculationError;
use crate::config::{RecalculationConfig, SourceDataPolicy};
use crate::scoring::domain::{MaterializedMetrics, VentureId};
use crate::scoring::{ScoreSnapshot, ScoringEngine};

/// Lifecycle of a single venture recompute, emitted on the `state` field of trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeState {
    Pending,
    Computing,
    Persisted,
    Failed,
}

impl RecomputeState {
    pub const fn label(self) -> &'static str {
        match self {
            RecomputeState::Pending => "pending",
            RecomputeState::Computing => "computing",
            RecomputeState::Persisted => "persisted",
            RecomputeState::Failed => "failed",
        }
    }
}

impl fmt::Display for RecomputeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-venture failure recorded by a bulk recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecalculationFailure {
    pub id: VentureId,
    pub reason: String,
}

/// Outcome of [`RecalculationOrchestrator::recompute_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecalculationSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<RecalculationFailure>,
}

impl RecalculationSummary {
    fn record_failure(&mut self, id: VentureId, reason: String) {
        self.failed += 1;
        self.failures.push(RecalculationFailure { id, reason });
    }
}

/// Coordinates fetch, scoring and persistence of materialized venture metrics.
///
/// Recomputes of the same venture are serialized through [`EntityLocks`] so a result computed
/// from stale inputs cannot overwrite a fresher one.
pub struct RecalculationOrchestrator<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
    locks: Arc<EntityLocks>,
    config: RecalculationConfig,
}

impl<R> Clone for RecalculationOrchestrator<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            engine: Arc::clone(&self.engine),
            locks: Arc::clone(&self.locks),
            config: self.config.clone(),
        }
    }
}

impl<R> RecalculationOrchestrator<R>
where
    R: VentureRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: ScoringEngine, config: RecalculationConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            locks: Arc::new(EntityLocks::new()),
            config,
        }
    }

    pub fn config(&self) -> &RecalculationConfig {
        &self.config
    }

    /// Score a venture without persisting anything.
    pub fn compute_one(&self, id: &VentureId) -> Result<ScoreSnapshot, RecalculationError> {
        let snapshot = self
            .repository
            .fetch(id)
            .map_err(|source| RecalculationError::Persistence {
                id: id.clone(),
                source,
            })?
            .ok_or_else(|| RecalculationError::NotFound(id.clone()))?;

        Ok(self.engine.score(&snapshot))
    }

    /// Score a venture and persist its materialized fields in one write.
    ///
    /// On failure the stored fields and `calculated_at` are left untouched.
    pub fn recompute_one(&self, id: &VentureId) -> Result<MaterializedMetrics, RecalculationError> {
        self.recompute_gated(id, None)
    }

    /// Recompute on a blocking worker, giving up after `timeout`.
    ///
    /// A timed-out recompute never persists: the worker re-checks the gate under the venture
    /// lock right before writing, so stored fields stay as they were.
    pub async fn recompute_with_timeout(
        &self,
        id: VentureId,
        timeout: Duration,
    ) -> Result<MaterializedMetrics, RecalculationError> {
        let gate = Arc::new(WriteGate::new(timeout));
        let orchestrator = self.clone();
        let worker_gate = Arc::clone(&gate);
        let task_id = id.clone();
        let handle = tokio::task::spawn_blocking(move || {
            orchestrator.recompute_gated(&task_id, Some(worker_gate.as_ref()))
        });

        await_gated(&id, handle, &gate).await
    }

    fn recompute_gated(
        &self,
        id: &VentureId,
        gate: Option<&WriteGate>,
    ) -> Result<MaterializedMetrics, RecalculationError> {
        self.locks.with_lock(id, || {
            debug!(venture_id = %id, state = %RecomputeState::Pending, "recompute queued");
            let result = self.recompute_locked(id, gate);
            match &result {
                Ok(fields) => debug!(
                    venture_id = %id,
                    state = %RecomputeState::Persisted,
                    gedsi_score = fields.gedsi_score,
                    social_impact_score = fields.social_impact_score,
                    "recompute persisted"
                ),
                Err(err) => debug!(
                    venture_id = %id,
                    state = %RecomputeState::Failed,
                    error = %err,
                    "recompute failed"
                ),
            }
            result
        })
    }

    fn recompute_locked(
        &self,
        id: &VentureId,
        gate: Option<&WriteGate>,
    ) -> Result<MaterializedMetrics, RecalculationError> {
        if let Some(gate) = gate.filter(|gate| gate.is_expired()) {
            return Err(gate.timed_out(id));
        }

        let snapshot = self
            .repository
            .fetch(id)
            .map_err(|source| RecalculationError::Persistence {
                id: id.clone(),
                source,
            })?
            .ok_or_else(|| RecalculationError::NotFound(id.clone()))?;

        debug!(venture_id = %id, state = %RecomputeState::Computing, "scoring venture");
        let score = self.engine.score(&snapshot);

        if score.founder_types_malformed && self.config.source_policy == SourceDataPolicy::Strict
        {
            return Err(RecalculationError::MalformedSourceData {
                id: id.clone(),
                detail: "founder types are not a JSON list of strings".to_string(),
            });
        }

        let calculated_at = next_timestamp(snapshot.venture.materialized.calculated_at);
        let fields = score.materialize(calculated_at);

        if let Some(gate) = gate {
            if !gate.try_commit() {
                return Err(gate.timed_out(id));
            }
        }

        self.repository
            .persist_materialized(id, fields)
            .map_err(|source| match source {
                RepositoryError::NotFound => RecalculationError::NotFound(id.clone()),
                other => RecalculationError::Persistence {
                    id: id.clone(),
                    source: other,
                },
            })?;

        Ok(fields)
    }

    /// Recompute every listed venture on a bounded pool of blocking workers.
    ///
    /// Failures are isolated per venture and collected into the summary; only a failure to
    /// list ventures aborts the batch. Each venture gets `entity_timeout`, so a stalled read or
    /// write is reported as a timeout instead of holding up the batch.
    pub async fn recompute_all(&self) -> Result<RecalculationSummary, RecalculationError> {
        let repository = Arc::clone(&self.repository);
        let ventures = tokio::task::spawn_blocking(move || repository.list())
            .await
            .map_err(|join| {
                RecalculationError::Listing(RepositoryError::Unavailable(join.to_string()))
            })?
            .map_err(RecalculationError::Listing)?;

        let total = ventures.len();
        let semaphore = Arc::new(Semaphore::new(self.config.worker_count.max(1)));
        let timeout = self.config.entity_timeout;
        let mut handles = Vec::with_capacity(total);

        for venture in ventures {
            let id = venture.id;
            let orchestrator = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let task_id = id.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    RecalculationError::TaskAborted {
                        id: task_id.clone(),
                        detail: "worker pool closed".to_string(),
                    }
                })?;
                orchestrator.recompute_with_timeout(task_id, timeout).await
            });
            handles.push((id, handle));
        }

        let mut summary = RecalculationSummary::default();
        for (id, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|join| {
                Err(RecalculationError::TaskAborted {
                    id: id.clone(),
                    detail: join.to_string(),
                })
            });

            match outcome {
                Ok(_) => summary.succeeded += 1,
                Err(err @ RecalculationError::TaskAborted { .. }) => {
                    error!(venture_id = %id, error = %err, "venture recompute task aborted");
                    summary.record_failure(id, err.to_string());
                }
                Err(err) => {
                    warn!(venture_id = %id, error = %err, "venture recompute failed");
                    summary.record_failure(id, err.to_string());
                }
            }
        }

        info!(
            total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "portfolio recompute finished"
        );

        Ok(summary)
    }
}

fn next_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(previous) if previous > now => previous,
        _ => now,
    }
}
