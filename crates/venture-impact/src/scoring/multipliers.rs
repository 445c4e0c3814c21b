use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SECTOR: &str = "Default";

/// Constants converting funding and headcount into estimated impact for one sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierRow {
    pub beneficiaries_per_funding: f64,
    pub beneficiaries_per_employee: f64,
    pub jobs_multiplier: f64,
    pub women_empowerment_rate: f64,
    pub disability_inclusion_rate: f64,
    pub youth_engagement_rate: f64,
}

impl MultiplierRow {
    pub const fn new(
        beneficiaries_per_funding: f64,
        beneficiaries_per_employee: f64,
        jobs_multiplier: f64,
        women_empowerment_rate: f64,
        disability_inclusion_rate: f64,
        youth_engagement_rate: f64,
    ) -> Self {
        Self {
            beneficiaries_per_funding,
            beneficiaries_per_employee,
            jobs_multiplier,
            women_empowerment_rate,
            disability_inclusion_rate,
            youth_engagement_rate,
        }
    }

    /// Negative or non-finite values become zero and rates are clamped into `[0, 1]`.
    fn sanitized(self) -> Self {
        let non_negative = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };
        let rate = |value: f64| non_negative(value).min(1.0);
        Self {
            beneficiaries_per_funding: non_negative(self.beneficiaries_per_funding),
            beneficiaries_per_employee: non_negative(self.beneficiaries_per_employee),
            jobs_multiplier: non_negative(self.jobs_multiplier),
            women_empowerment_rate: rate(self.women_empowerment_rate),
            disability_inclusion_rate: rate(self.disability_inclusion_rate),
            youth_engagement_rate: rate(self.youth_engagement_rate),
        }
    }
}

const STANDARD_ROWS: &[(&str, MultiplierRow)] = &[
    ("Agriculture", MultiplierRow::new(0.005, 100.0, 5.0, 0.5, 0.1, 0.3)),
    ("Healthcare", MultiplierRow::new(0.008, 150.0, 3.0, 0.6, 0.2, 0.25)),
    ("Education", MultiplierRow::new(0.01, 200.0, 2.5, 0.55, 0.15, 0.6)),
    ("Clean Energy", MultiplierRow::new(0.004, 80.0, 4.0, 0.45, 0.08, 0.3)),
    ("Fintech", MultiplierRow::new(0.006, 120.0, 2.0, 0.5, 0.05, 0.4)),
    ("Water & Sanitation", MultiplierRow::new(0.009, 180.0, 3.5, 0.55, 0.12, 0.3)),
    ("Manufacturing", MultiplierRow::new(0.002, 40.0, 6.0, 0.4, 0.06, 0.35)),
    ("Technology", MultiplierRow::new(0.003, 60.0, 2.0, 0.4, 0.07, 0.5)),
    ("Retail", MultiplierRow::new(0.002, 50.0, 4.0, 0.55, 0.05, 0.35)),
];

const STANDARD_DEFAULT: MultiplierRow = MultiplierRow::new(0.003, 50.0, 3.0, 0.5, 0.1, 0.3);

/// Static sector lookup. Unknown or missing sectors resolve to the `Default` row.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorMultiplierTable {
    rows: BTreeMap<String, MultiplierRow>,
    default_row: MultiplierRow,
}

impl SectorMultiplierTable {
    pub fn standard() -> Self {
        Self::from_rows(
            STANDARD_ROWS
                .iter()
                .map(|(sector, row)| (sector.to_string(), *row)),
            STANDARD_DEFAULT,
        )
    }

    /// Build a custom table. A row named `Default` replaces `default_row`.
    pub fn from_rows<I>(rows: I, default_row: MultiplierRow) -> Self
    where
        I: IntoIterator<Item = (String, MultiplierRow)>,
    {
        let mut table = Self {
            rows: BTreeMap::new(),
            default_row: default_row.sanitized(),
        };
        for (sector, row) in rows {
            let key = sector_key(&sector);
            if key == sector_key(DEFAULT_SECTOR) {
                table.default_row = row.sanitized();
            } else {
                table.rows.insert(key, row.sanitized());
            }
        }
        table
    }

    pub fn lookup(&self, sector: Option<&str>) -> &MultiplierRow {
        sector
            .and_then(|name| self.rows.get(&sector_key(name)))
            .unwrap_or(&self.default_row)
    }
}

impl Default for SectorMultiplierTable {
    fn default() -> Self {
        Self::standard()
    }
}

pub(crate) fn sector_key(sector: &str) -> String {
    sector.trim().to_lowercase()
}
