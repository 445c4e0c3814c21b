//! Score computation core: pure functions deriving GEDSI, compliance and social impact
//! figures from a venture snapshot.

pub mod domain;
mod gedsi;
mod impact;
pub mod input;
pub mod multipliers;

#[cfg(test)]
mod tests;

pub use domain::{
    FounderType, MaterializedMetrics, MetricRecord, SocialImpactMetrics, Venture, VentureId,
    VentureSnapshot,
};
pub use gedsi::{
    compute_gedsi_compliance_rate, compute_gedsi_score, GedsiScore, GedsiStrategy,
    COMPLIANCE_THRESHOLD,
};
pub use impact::{
    compute_social_impact_metrics, compute_social_impact_score, effective_funding,
    effective_team_size, founder_bonus, is_impact_sector, DEFAULT_FUNDING, DEFAULT_TEAM_SIZE,
    IMPACT_SECTORS,
};
pub use input::{FounderTypes, GedsiSummary, ScoreOverride, ScoringInput};
pub use multipliers::{MultiplierRow, SectorMultiplierTable, DEFAULT_SECTOR};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;

/// Stateless evaluator applying the multiplier table and scoring knobs to a snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    table: SectorMultiplierTable,
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(table: SectorMultiplierTable, config: ScoringConfig) -> Self {
        Self { table, config }
    }

    pub fn score(&self, snapshot: &VentureSnapshot) -> ScoreSnapshot {
        self.score_input(&ScoringInput::from_snapshot(snapshot))
    }

    pub fn score_input(&self, input: &ScoringInput<'_>) -> ScoreSnapshot {
        let gedsi = compute_gedsi_score(input);
        let compliance_rate = compute_gedsi_compliance_rate(input.metrics);
        let impact = compute_social_impact_metrics(input, &self.table, &self.config);
        let social_impact_score = compute_social_impact_score(input, &impact, gedsi);

        ScoreSnapshot {
            venture_id: input.venture.id.clone(),
            gedsi_score: gedsi.value,
            gedsi_source: gedsi.source,
            social_impact_score,
            gedsi_compliance_rate: compliance_rate,
            impact,
            founder_types_malformed: input.founder_types.is_malformed(),
        }
    }
}

/// Result of scoring one venture, before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub venture_id: VentureId,
    pub gedsi_score: u8,
    pub gedsi_source: GedsiStrategy,
    pub social_impact_score: u8,
    pub gedsi_compliance_rate: u8,
    pub impact: SocialImpactMetrics,
    pub founder_types_malformed: bool,
}

impl ScoreSnapshot {
    /// Materialized fields to persist for this score, stamped with `calculated_at`.
    pub fn materialize(&self, calculated_at: DateTime<Utc>) -> MaterializedMetrics {
        MaterializedMetrics {
            gedsi_score: self.gedsi_score,
            social_impact_score: self.social_impact_score,
            gedsi_compliance_rate: self.gedsi_compliance_rate,
            total_beneficiaries: self.impact.total_beneficiaries,
            jobs_created: self.impact.jobs_created,
            women_empowered: self.impact.women_empowered,
            disability_inclusive: self.impact.disability_inclusive,
            youth_engaged: self.impact.youth_engaged,
            calculated_at: Some(calculated_at),
        }
    }
}
