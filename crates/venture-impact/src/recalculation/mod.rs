//! Recalculation orchestrator and the trigger surface that keeps materialized venture
//! metrics consistent with their source data.

mod gate;
mod locks;
mod orchestrator;
pub mod repository;
pub mod router;
mod store;
mod trigger;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub use locks::EntityLocks;
pub use orchestrator::{
    RecalculationFailure, RecalculationOrchestrator, RecalculationSummary, RecomputeState,
};
pub use repository::{RepositoryError, VentureRepository};
pub use router::{recalculation_router, RecalculationServices};
pub use store::InMemoryVentureRepository;
pub use trigger::RecalculationTrigger;

use crate::scoring::domain::VentureId;

/// Error raised by the recalculation orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum RecalculationError {
    #[error("venture {0} not found")]
    NotFound(VentureId),
    #[error("persistence failure for venture {id}: {source}")]
    Persistence {
        id: VentureId,
        #[source]
        source: RepositoryError,
    },
    #[error("venture {id} has malformed source data: {detail}")]
    MalformedSourceData { id: VentureId, detail: String },
    #[error("unable to list ventures: {0}")]
    Listing(#[source] RepositoryError),
    #[error("recompute of venture {id} timed out after {timeout:?}")]
    TimedOut { id: VentureId, timeout: Duration },
    #[error("recompute task for venture {id} aborted: {detail}")]
    TaskAborted { id: VentureId, detail: String },
}
