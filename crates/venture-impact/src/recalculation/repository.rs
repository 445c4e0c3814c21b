use crate::scoring::domain::{MaterializedMetrics, Venture, VentureId, VentureSnapshot};

/// Storage abstraction so the orchestrator can be exercised in isolation.
///
/// `persist_materialized` must apply every field in `fields` together or none of them.
pub trait VentureRepository: Send + Sync {
    fn fetch(&self, id: &VentureId) -> Result<Option<VentureSnapshot>, RepositoryError>;
    fn list(&self) -> Result<Vec<Venture>, RepositoryError>;
    fn persist_materialized(
        &self,
        id: &VentureId,
        fields: MaterializedMetrics,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
