use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked ventures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VentureId(pub String);

impl VentureId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VentureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Venture as stored by the intake collaborators.
///
/// Source fields are kept exactly as persisted, including the opaque JSON blobs; they are only
/// interpreted by [`super::input::ScoringInput`]. `materialized` is owned by the recalculation
/// orchestrator and is never written by anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venture {
    pub id: VentureId,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub funding_raised: Option<f64>,
    #[serde(default)]
    pub team_size: Option<u32>,
    /// Serialized list of founder tags, e.g. `["women-led","rural-focus"]`.
    #[serde(default)]
    pub founder_types: Option<String>,
    /// Upstream score annotation, e.g. `{"gedsiScore": 82}`.
    #[serde(default)]
    pub score_override: Option<String>,
    /// Venture-level GEDSI summary with named sub-scores.
    #[serde(default)]
    pub gedsi_summary: Option<String>,
    #[serde(default)]
    pub materialized: MaterializedMetrics,
}

impl Venture {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: VentureId::new(id),
            name: name.into(),
            sector: None,
            funding_raised: None,
            team_size: None,
            founder_types: None,
            score_override: None,
            gedsi_summary: None,
            materialized: MaterializedMetrics::default(),
        }
    }
}

/// Progress measurement recorded against a venture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub category: String,
    pub current_value: f64,
    pub target_value: f64,
}

impl MetricRecord {
    pub fn new(category: impl Into<String>, current_value: f64, target_value: f64) -> Self {
        Self {
            category: category.into(),
            current_value,
            target_value,
        }
    }

    /// `current / target` when the record is usable for ratio scoring.
    pub fn progress_ratio(&self) -> Option<f64> {
        if self.target_value > 0.0 && self.target_value.is_finite() && self.current_value.is_finite()
        {
            Some(self.current_value / self.target_value)
        } else {
            None
        }
    }
}

/// A venture together with its metric records, as read in one repository call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentureSnapshot {
    pub venture: Venture,
    pub metrics: Vec<MetricRecord>,
}

/// Estimated beneficiary and job counts derived from funding and headcount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialImpactMetrics {
    pub total_beneficiaries: u64,
    pub jobs_created: u64,
    pub women_empowered: u64,
    pub disability_inclusive: u64,
    pub youth_engaged: u64,
}

/// Engine-owned fields persisted on the venture after a successful recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterializedMetrics {
    pub gedsi_score: u8,
    pub social_impact_score: u8,
    pub gedsi_compliance_rate: u8,
    pub total_beneficiaries: u64,
    pub jobs_created: u64,
    pub women_empowered: u64,
    pub disability_inclusive: u64,
    pub youth_engaged: u64,
    pub calculated_at: Option<DateTime<Utc>>,
}

impl MaterializedMetrics {
    pub fn is_calculated(&self) -> bool {
        self.calculated_at.is_some()
    }
}

/// Founder tags that carry a bonus in the social impact estimate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FounderType {
    WomenLed,
    DisabilityInclusive,
    YouthLed,
    RuralFocus,
    Other(String),
}

impl FounderType {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "women-led" => Self::WomenLed,
            "disability-inclusive" => Self::DisabilityInclusive,
            "youth-led" => Self::YouthLed,
            "rural-focus" => Self::RuralFocus,
            _ => Self::Other(normalized),
        }
    }

    /// Additive contribution to the founder bonus multiplier.
    pub fn bonus(&self) -> f64 {
        match self {
            FounderType::WomenLed => 0.3,
            FounderType::DisabilityInclusive => 0.2,
            FounderType::YouthLed => 0.15,
            FounderType::RuralFocus => 0.1,
            FounderType::Other(_) => 0.0,
        }
    }
}
