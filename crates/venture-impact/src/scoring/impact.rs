use crate::config::ScoringConfig;

use super::domain::{SocialImpactMetrics, Venture};
use super::gedsi::{clamp_score, GedsiScore};
use super::input::ScoringInput;
use super::multipliers::{sector_key, SectorMultiplierTable};

pub const DEFAULT_FUNDING: f64 = 100_000.0;
pub const DEFAULT_TEAM_SIZE: u32 = 5;
const FUNDING_PER_JOB: f64 = 50_000.0;
const BASE_IMPACT_SCORE: f64 = 50.0;

pub const IMPACT_SECTORS: &[&str] = &[
    "Agriculture",
    "Healthcare",
    "Education",
    "Clean Energy",
    "Water & Sanitation",
];

/// Funding used for estimates: missing, zero, negative and non-finite values fall back to the default.
pub fn effective_funding(venture: &Venture) -> f64 {
    venture
        .funding_raised
        .filter(|funding| funding.is_finite() && *funding > 0.0)
        .unwrap_or(DEFAULT_FUNDING)
}

pub fn effective_team_size(venture: &Venture) -> u32 {
    venture
        .team_size
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_TEAM_SIZE)
}

pub fn is_impact_sector(sector: Option<&str>) -> bool {
    sector
        .map(sector_key)
        .map(|key| IMPACT_SECTORS.iter().any(|name| sector_key(name) == key))
        .unwrap_or(false)
}

/// Founder bonus multiplier, optionally capped by configuration.
pub fn founder_bonus(input: &ScoringInput<'_>, config: &ScoringConfig) -> f64 {
    let bonus = input.founder_types.bonus_multiplier();
    match config.founder_bonus_ceiling {
        Some(ceiling) => bonus.min(ceiling),
        None => bonus,
    }
}

pub fn compute_social_impact_metrics(
    input: &ScoringInput<'_>,
    table: &SectorMultiplierTable,
    config: &ScoringConfig,
) -> SocialImpactMetrics {
    let venture = input.venture;
    let funding = effective_funding(venture);
    let team = effective_team_size(venture) as f64;
    let row = table.lookup(venture.sector.as_deref());

    let from_funding = (funding * row.beneficiaries_per_funding).floor();
    let from_team = team * row.beneficiaries_per_employee;
    let base_beneficiaries = from_funding + from_team;
    let base_jobs = (team * row.jobs_multiplier + funding / FUNDING_PER_JOB).floor();
    let base_women = (base_beneficiaries * row.women_empowerment_rate).floor();
    let base_disability = (base_beneficiaries * row.disability_inclusion_rate).floor();
    let base_youth = (base_beneficiaries * row.youth_engagement_rate).floor();

    let bonus = founder_bonus(input, config);
    let scaled = |base: f64| to_count(base * bonus);

    SocialImpactMetrics {
        total_beneficiaries: scaled(base_beneficiaries),
        jobs_created: scaled(base_jobs),
        women_empowered: scaled(base_women),
        disability_inclusive: scaled(base_disability),
        youth_engaged: scaled(base_youth),
    }
}

pub fn compute_social_impact_score(
    input: &ScoringInput<'_>,
    metrics: &SocialImpactMetrics,
    gedsi: GedsiScore,
) -> u8 {
    let venture = input.venture;
    let funding = effective_funding(venture);
    let team = effective_team_size(venture) as f64;
    let beneficiaries = metrics.total_beneficiaries as f64;

    let mut score = BASE_IMPACT_SCORE;

    let per_dollar = beneficiaries / funding;
    if per_dollar > 0.02 {
        score += 15.0;
    } else if per_dollar > 0.01 {
        score += 10.0;
    } else if per_dollar > 0.005 {
        score += 5.0;
    }

    let jobs_per_employee = metrics.jobs_created as f64 / team;
    if jobs_per_employee > 4.0 {
        score += 10.0;
    } else if jobs_per_employee > 3.0 {
        score += 5.0;
    }

    if beneficiaries > 0.0 {
        if metrics.women_empowered as f64 / beneficiaries > 0.5 {
            score += 10.0;
        }
        if metrics.disability_inclusive as f64 / beneficiaries > 0.1 {
            score += 5.0;
        }
        if metrics.youth_engaged as f64 / beneficiaries > 0.3 {
            score += 5.0;
        }
    }

    if is_impact_sector(venture.sector.as_deref()) {
        score += 5.0;
    }

    if gedsi.value > 70 {
        score += 10.0;
    } else if gedsi.value > 50 {
        score += 5.0;
    }

    clamp_score(score.min(100.0))
}

fn to_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}
