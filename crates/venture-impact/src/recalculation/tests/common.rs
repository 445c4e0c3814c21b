use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::config::{RecalculationConfig, ScoringConfig, SourceDataPolicy};
use crate::recalculation::repository::{RepositoryError, VentureRepository};
use crate::recalculation::{InMemoryVentureRepository, RecalculationOrchestrator};
use crate::scoring::domain::{MaterializedMetrics, MetricRecord, Venture, VentureId, VentureSnapshot};
use crate::scoring::{ScoringEngine, SectorMultiplierTable};

pub(super) fn agriculture_venture(id: &str) -> Venture {
    let mut venture = Venture::new(id, format!("Venture {id}"));
    venture.sector = Some("Agriculture".to_string());
    venture.funding_raised = Some(100_000.0);
    venture.team_size = Some(5);
    venture.founder_types = Some(r#"["women-led"]"#.to_string());
    venture
}

/// Four ventures; `v-3` carries founder types that fail to parse.
pub(super) fn seeded_repository() -> Arc<InMemoryVentureRepository> {
    let repository = Arc::new(InMemoryVentureRepository::new());
    for id in ["v-1", "v-2", "v-3", "v-4"] {
        let mut venture = agriculture_venture(id);
        if id == "v-3" {
            venture.founder_types = Some("women-led, youth-led".to_string());
        }
        repository.upsert_venture(venture);
        repository
            .add_metric(&VentureId::new(id), MetricRecord::new("gender", 90.0, 100.0))
            .expect("venture seeded");
    }
    repository
}

pub(super) fn config(policy: SourceDataPolicy) -> RecalculationConfig {
    RecalculationConfig {
        worker_count: 2,
        trigger_timeout: Duration::from_secs(5),
        source_policy: policy,
        ..RecalculationConfig::default()
    }
}

pub(super) fn orchestrator<R>(repository: Arc<R>, policy: SourceDataPolicy) -> RecalculationOrchestrator<R>
where
    R: VentureRepository + 'static,
{
    RecalculationOrchestrator::new(
        repository,
        ScoringEngine::new(SectorMultiplierTable::standard(), ScoringConfig::default()),
        config(policy),
    )
}

pub(super) fn materialized(repository: &InMemoryVentureRepository, id: &str) -> MaterializedMetrics {
    repository
        .fetch(&VentureId::new(id))
        .expect("fetch succeeds")
        .expect("venture present")
        .venture
        .materialized
}

/// Delegates to an in-memory store, failing or stalling on selected ids.
#[derive(Default)]
pub(super) struct FaultyRepository {
    pub(super) inner: InMemoryVentureRepository,
    pub(super) fail_persist: HashSet<VentureId>,
    pub(super) panic_on_fetch: HashSet<VentureId>,
    pub(super) fetch_delay: Option<Duration>,
    pub(super) slow_fetch: HashMap<VentureId, Duration>,
    pub(super) list_offline: bool,
}

impl FaultyRepository {
    pub(super) fn wrapping(inner: &InMemoryVentureRepository) -> Self {
        Self {
            inner: inner.clone(),
            ..Self::default()
        }
    }
}

impl VentureRepository for FaultyRepository {
    fn fetch(&self, id: &VentureId) -> Result<Option<VentureSnapshot>, RepositoryError> {
        if self.panic_on_fetch.contains(id) {
            panic!("corrupt row for {id}");
        }
        if let Some(delay) = self.slow_fetch.get(id).copied().or(self.fetch_delay) {
            thread::sleep(delay);
        }
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<Venture>, RepositoryError> {
        if self.list_offline {
            return Err(RepositoryError::Unavailable("database offline".to_string()));
        }
        self.inner.list()
    }

    fn persist_materialized(
        &self,
        id: &VentureId,
        fields: MaterializedMetrics,
    ) -> Result<(), RepositoryError> {
        if self.fail_persist.contains(id) {
            return Err(RepositoryError::Unavailable("write rejected".to_string()));
        }
        self.inner.persist_materialized(id, fields)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
