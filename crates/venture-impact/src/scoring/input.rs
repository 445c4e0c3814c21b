use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::domain::{FounderType, MetricRecord, Venture, VentureSnapshot};

/// Founder tags after parsing the stored list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FounderTypes {
    Parsed(BTreeSet<FounderType>),
    /// The stored value was not a JSON list of strings. Scoring treats this as no tags.
    Malformed { raw: String },
}

impl FounderTypes {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
            return Self::Parsed(BTreeSet::new());
        };

        match serde_json::from_str::<Option<Vec<String>>>(raw) {
            Ok(tags) => Self::Parsed(
                tags.unwrap_or_default()
                    .iter()
                    .map(|tag| FounderType::parse(tag))
                    .collect(),
            ),
            Err(_) => Self::Malformed {
                raw: raw.to_string(),
            },
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, FounderTypes::Malformed { .. })
    }

    pub fn contains(&self, founder_type: &FounderType) -> bool {
        match self {
            FounderTypes::Parsed(tags) => tags.contains(founder_type),
            FounderTypes::Malformed { .. } => false,
        }
    }

    /// `1.0` plus the additive bonus of every recognised tag.
    pub fn bonus_multiplier(&self) -> f64 {
        match self {
            FounderTypes::Parsed(tags) => 1.0 + tags.iter().map(FounderType::bonus).sum::<f64>(),
            FounderTypes::Malformed { .. } => 1.0,
        }
    }
}

/// Validated upstream score annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreOverride {
    pub gedsi_score: f64,
}

impl ScoreOverride {
    /// Returns `None` unless the blob is JSON with a finite numeric `gedsiScore`.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let value = parse_object(raw?)?;
        let gedsi_score = value
            .get("gedsiScore")
            .and_then(Value::as_f64)
            .filter(|score| score.is_finite())?;
        Some(Self { gedsi_score })
    }
}

/// Named sub-scores found in the venture-level GEDSI summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GedsiSummary {
    pub women_leadership: Option<f64>,
    pub disability_inclusion: Option<f64>,
    pub accessibility_score: Option<f64>,
    pub diversity_score: Option<f64>,
}

impl GedsiSummary {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(value) = raw.and_then(parse_object) else {
            return Self::default();
        };

        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_f64)
                .filter(|score| score.is_finite() && *score >= 0.0)
        };

        Self {
            women_leadership: field("womenLeadership"),
            disability_inclusion: field("disabilityInclusion"),
            accessibility_score: field("accessibilityScore"),
            diversity_score: field("diversityScore"),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> {
        [
            self.women_leadership,
            self.disability_inclusion,
            self.accessibility_score,
            self.diversity_score,
        ]
        .into_iter()
        .flatten()
    }
}

fn parse_object(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => {
            debug!("annotation is valid JSON but not an object; ignoring");
            None
        }
        Err(err) => {
            debug!(error = %err, "annotation is not valid JSON; ignoring");
            None
        }
    }
}

/// Everything the score computation core reads, parsed once at the data boundary.
#[derive(Debug, Clone)]
pub struct ScoringInput<'a> {
    pub venture: &'a Venture,
    pub metrics: &'a [MetricRecord],
    pub founder_types: FounderTypes,
    pub score_override: Option<ScoreOverride>,
    pub summary: GedsiSummary,
}

impl<'a> ScoringInput<'a> {
    pub fn new(venture: &'a Venture, metrics: &'a [MetricRecord]) -> Self {
        let founder_types = FounderTypes::parse(venture.founder_types.as_deref());
        if let FounderTypes::Malformed { raw } = &founder_types {
            warn!(venture_id = %venture.id, raw = %raw, "founder types failed to parse; treating as empty");
        }

        Self {
            venture,
            metrics,
            founder_types,
            score_override: ScoreOverride::parse(venture.score_override.as_deref()),
            summary: GedsiSummary::parse(venture.gedsi_summary.as_deref()),
        }
    }

    pub fn from_snapshot(snapshot: &'a VentureSnapshot) -> Self {
        Self::new(&snapshot.venture, &snapshot.metrics)
    }
}
