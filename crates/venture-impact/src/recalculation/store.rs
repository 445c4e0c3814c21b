use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::repository::{RepositoryError, VentureRepository};
use crate::scoring::domain::{
    MaterializedMetrics, MetricRecord, Venture, VentureId, VentureSnapshot,
};

/// Process-local repository used by the CLI, the demo server and tests.
///
/// The mutating helpers stand in for the intake collaborators: they replace source fields
/// but never touch a venture's materialized metrics.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVentureRepository {
    records: Arc<Mutex<BTreeMap<VentureId, VentureSnapshot>>>,
}

impl InMemoryVentureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<VentureId, VentureSnapshot>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a venture or update its source fields, keeping metrics and materialized values.
    pub fn upsert_venture(&self, mut venture: Venture) {
        let mut records = self.records();
        match records.get_mut(&venture.id) {
            Some(existing) => {
                venture.materialized = existing.venture.materialized;
                existing.venture = venture;
            }
            None => {
                venture.materialized = MaterializedMetrics::default();
                records.insert(
                    venture.id.clone(),
                    VentureSnapshot {
                        venture,
                        metrics: Vec::new(),
                    },
                );
            }
        }
    }

    pub fn add_metric(&self, id: &VentureId, record: MetricRecord) -> Result<(), RepositoryError> {
        let mut records = self.records();
        let snapshot = records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        snapshot.metrics.push(record);
        Ok(())
    }

    pub fn replace_metrics(
        &self,
        id: &VentureId,
        metrics: Vec<MetricRecord>,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records();
        let snapshot = records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        snapshot.metrics = metrics;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl VentureRepository for InMemoryVentureRepository {
    fn fetch(&self, id: &VentureId) -> Result<Option<VentureSnapshot>, RepositoryError> {
        Ok(self.records().get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Venture>, RepositoryError> {
        Ok(self
            .records()
            .values()
            .map(|snapshot| snapshot.venture.clone())
            .collect())
    }

    fn persist_materialized(
        &self,
        id: &VentureId,
        fields: MaterializedMetrics,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records();
        let snapshot = records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        snapshot.venture.materialized = fields;
        Ok(())
    }
}
