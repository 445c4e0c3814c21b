use crate::cli::SourceArgs;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use venture_impact::config::AppConfig;
use venture_impact::error::AppError;
use venture_impact::import::PortfolioCsvImporter;
use venture_impact::recalculation::{InMemoryVentureRepository, RecalculationOrchestrator};
use venture_impact::scoring::{ScoringEngine, SectorMultiplierTable};

const SAMPLE_VENTURES: &str = include_str!("../data/sample_ventures.csv");
const SAMPLE_METRICS: &str = include_str!("../data/sample_metrics.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_repository(source: &SourceArgs) -> Result<InMemoryVentureRepository, AppError> {
    let repository = match &source.ventures_csv {
        Some(ventures) => PortfolioCsvImporter::from_paths(ventures, source.metrics_csv.as_ref())?,
        None => sample_repository()?,
    };
    Ok(repository)
}

pub(crate) fn sample_repository() -> Result<InMemoryVentureRepository, AppError> {
    let repository = PortfolioCsvImporter::from_readers(
        SAMPLE_VENTURES.as_bytes(),
        Some(SAMPLE_METRICS.as_bytes()),
    )?;
    Ok(repository)
}

pub(crate) fn build_orchestrator(
    config: &AppConfig,
    repository: Arc<InMemoryVentureRepository>,
) -> RecalculationOrchestrator<InMemoryVentureRepository> {
    let engine = ScoringEngine::new(SectorMultiplierTable::standard(), config.scoring.clone());
    RecalculationOrchestrator::new(repository, engine, config.recalculation.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sample_portfolio_imports() {
        let repository = sample_repository().expect("sample data parses");
        assert_eq!(repository.len(), 5);
    }

    #[test]
    fn missing_intake_export_is_reported() {
        let source = SourceArgs {
            ventures_csv: Some("does-not-exist.csv".into()),
            metrics_csv: None,
        };
        assert!(matches!(
            load_repository(&source),
            Err(AppError::Import(_))
        ));
    }
}
