use serde::{Deserialize, Serialize};

use super::domain::MetricRecord;
use super::input::ScoringInput;

/// Share of target a record must reach to count as compliant.
pub const COMPLIANCE_THRESHOLD: f64 = 0.8;

/// Ordered sources for the GEDSI score; the first strategy yielding a value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GedsiStrategy {
    Override,
    SummaryAverage,
    MetricRatioAverage,
    Default,
}

impl GedsiStrategy {
    pub const ORDERED: [GedsiStrategy; 4] = [
        GedsiStrategy::Override,
        GedsiStrategy::SummaryAverage,
        GedsiStrategy::MetricRatioAverage,
        GedsiStrategy::Default,
    ];

    pub fn evaluate(self, input: &ScoringInput<'_>) -> Option<u8> {
        match self {
            GedsiStrategy::Override => input
                .score_override
                .map(|score_override| clamp_score(score_override.gedsi_score)),
            GedsiStrategy::SummaryAverage => mean(input.summary.values()).map(clamp_score),
            GedsiStrategy::MetricRatioAverage => mean(
                input
                    .metrics
                    .iter()
                    .filter_map(MetricRecord::progress_ratio)
                    .map(|ratio| ratio.clamp(0.0, 1.0) * 100.0),
            )
            .map(clamp_score),
            GedsiStrategy::Default => Some(0),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GedsiStrategy::Override => "override",
            GedsiStrategy::SummaryAverage => "summary_average",
            GedsiStrategy::MetricRatioAverage => "metric_ratio_average",
            GedsiStrategy::Default => "default",
        }
    }
}

/// GEDSI score together with the strategy that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GedsiScore {
    pub value: u8,
    pub source: GedsiStrategy,
}

pub fn compute_gedsi_score(input: &ScoringInput<'_>) -> GedsiScore {
    for strategy in GedsiStrategy::ORDERED {
        if let Some(value) = strategy.evaluate(input) {
            return GedsiScore {
                value,
                source: strategy,
            };
        }
    }

    GedsiScore {
        value: 0,
        source: GedsiStrategy::Default,
    }
}

/// Percentage of records at or above 80% of target. Records without a positive target
/// still count toward the denominator.
pub fn compute_gedsi_compliance_rate(records: &[MetricRecord]) -> u8 {
    if records.is_empty() {
        return 0;
    }

    let compliant = records
        .iter()
        .filter(|record| {
            record.target_value > 0.0
                && record.current_value / record.target_value >= COMPLIANCE_THRESHOLD
        })
        .count();

    clamp_score(100.0 * compliant as f64 / records.len() as f64)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub(crate) fn clamp_score(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}
