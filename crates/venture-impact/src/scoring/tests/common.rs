use crate::config::ScoringConfig;
use crate::scoring::domain::{MetricRecord, Venture, VentureSnapshot};
use crate::scoring::multipliers::SectorMultiplierTable;
use crate::scoring::ScoringEngine;

/// Agriculture venture with 100k funding, five staff and a women-led founding team.
pub(super) fn agriculture_venture() -> Venture {
    let mut venture = Venture::new("v-agri", "Paddy Cooperative");
    venture.sector = Some("Agriculture".to_string());
    venture.funding_raised = Some(100_000.0);
    venture.team_size = Some(5);
    venture.founder_types = Some(r#"["women-led"]"#.to_string());
    venture
}

pub(super) fn education_venture() -> Venture {
    let mut venture = Venture::new("v-edu", "Village Classrooms");
    venture.sector = Some("Education".to_string());
    venture.funding_raised = Some(200_000.0);
    venture.team_size = Some(10);
    venture
}

pub(super) fn snapshot(venture: Venture, metrics: Vec<MetricRecord>) -> VentureSnapshot {
    VentureSnapshot { venture, metrics }
}

pub(super) fn record(current: f64, target: f64) -> MetricRecord {
    MetricRecord::new("gender", current, target)
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(SectorMultiplierTable::standard(), ScoringConfig::default())
}

pub(super) fn capped_engine(ceiling: f64) -> ScoringEngine {
    ScoringEngine::new(
        SectorMultiplierTable::standard(),
        ScoringConfig {
            founder_bonus_ceiling: Some(ceiling),
        },
    )
}
