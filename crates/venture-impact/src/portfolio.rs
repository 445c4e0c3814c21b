//! Fleet-wide totals and averages over materialized venture metrics.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::recalculation::VentureRepository;
use crate::scoring::domain::Venture;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioSnapshot {
    pub venture_count: usize,
    pub calculated_count: usize,
    pub total_beneficiaries: u64,
    pub total_jobs_created: u64,
    pub total_women_empowered: u64,
    pub total_disability_inclusive: u64,
    pub total_youth_engaged: u64,
    pub average_gedsi_score: u8,
    pub average_social_impact_score: u8,
    pub average_compliance_rate: u8,
}

/// Reduce materialized fields only; nothing is recomputed here.
pub fn aggregate(ventures: &[Venture]) -> PortfolioSnapshot {
    if ventures.is_empty() {
        return PortfolioSnapshot::default();
    }

    let mut snapshot = PortfolioSnapshot {
        venture_count: ventures.len(),
        ..PortfolioSnapshot::default()
    };
    let (mut gedsi, mut impact, mut compliance) = (0u64, 0u64, 0u64);

    for venture in ventures {
        let fields = &venture.materialized;
        if fields.is_calculated() {
            snapshot.calculated_count += 1;
        }
        snapshot.total_beneficiaries = snapshot
            .total_beneficiaries
            .saturating_add(fields.total_beneficiaries);
        snapshot.total_jobs_created = snapshot.total_jobs_created.saturating_add(fields.jobs_created);
        snapshot.total_women_empowered = snapshot
            .total_women_empowered
            .saturating_add(fields.women_empowered);
        snapshot.total_disability_inclusive = snapshot
            .total_disability_inclusive
            .saturating_add(fields.disability_inclusive);
        snapshot.total_youth_engaged = snapshot
            .total_youth_engaged
            .saturating_add(fields.youth_engaged);
        gedsi += u64::from(fields.gedsi_score);
        impact += u64::from(fields.social_impact_score);
        compliance += u64::from(fields.gedsi_compliance_rate);
    }

    let count = ventures.len() as f64;
    let average = |sum: u64| (sum as f64 / count).round().min(100.0) as u8;
    snapshot.average_gedsi_score = average(gedsi);
    snapshot.average_social_impact_score = average(impact);
    snapshot.average_compliance_rate = average(compliance);
    snapshot
}

/// Read side used by reporting collaborators.
pub struct PortfolioReporter<R> {
    repository: Arc<R>,
}

impl<R> Clone for PortfolioReporter<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: VentureRepository> PortfolioReporter<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Never fails: a listing error is logged and reported as the empty portfolio.
    pub fn portfolio_metrics(&self) -> PortfolioSnapshot {
        match self.repository.list() {
            Ok(ventures) => aggregate(&ventures),
            Err(err) => {
                warn!(error = %err, "unable to list ventures for portfolio metrics");
                PortfolioSnapshot::default()
            }
        }
    }
}
