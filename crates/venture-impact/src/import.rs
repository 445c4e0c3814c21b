//! Loads intake-form CSV exports into an in-memory venture repository.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::recalculation::InMemoryVentureRepository;
use crate::scoring::domain::{MetricRecord, Venture, VentureId};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownVenture { venture_id: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read intake export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid intake CSV data: {}", err),
            ImportError::UnknownVenture { venture_id } => write!(
                f,
                "metric row references unknown venture '{}'",
                venture_id
            ),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::UnknownVenture { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct VentureRow {
    id: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sector: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    funding_raised: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    team_size: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    founder_types: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    score_override: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gedsi_summary: Option<String>,
}

impl VentureRow {
    /// Numeric columns that do not parse are treated as absent so scoring falls back to defaults.
    fn into_venture(self) -> Venture {
        let mut venture = Venture::new(self.id, self.name);
        venture.sector = self.sector;
        venture.funding_raised = self
            .funding_raised
            .as_deref()
            .and_then(|raw| raw.replace(',', "").parse::<f64>().ok());
        venture.team_size = self
            .team_size
            .as_deref()
            .and_then(|raw| raw.parse::<u32>().ok());
        venture.founder_types = self.founder_types;
        venture.score_override = self.score_override;
        venture.gedsi_summary = self.gedsi_summary;
        venture
    }
}

#[derive(Debug, Deserialize)]
struct MetricRow {
    venture_id: String,
    category: String,
    current_value: f64,
    target_value: f64,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

pub struct PortfolioCsvImporter;

impl PortfolioCsvImporter {
    pub fn from_paths<P: AsRef<Path>>(
        ventures: P,
        metrics: Option<P>,
    ) -> Result<InMemoryVentureRepository, ImportError> {
        let ventures = std::fs::File::open(ventures)?;
        match metrics {
            Some(path) => {
                let metrics = std::fs::File::open(path)?;
                Self::from_readers(ventures, Some(metrics))
            }
            None => Self::from_readers(ventures, None::<std::fs::File>),
        }
    }

    pub fn from_readers<V: Read, M: Read>(
        ventures: V,
        metrics: Option<M>,
    ) -> Result<InMemoryVentureRepository, ImportError> {
        let repository = InMemoryVentureRepository::new();

        for row in reader(ventures).deserialize::<VentureRow>() {
            repository.upsert_venture(row?.into_venture());
        }

        let mut metric_count = 0usize;
        if let Some(metrics) = metrics {
            for row in reader(metrics).deserialize::<MetricRow>() {
                let row = row?;
                let id = VentureId::new(row.venture_id.clone());
                repository
                    .add_metric(
                        &id,
                        MetricRecord::new(row.category, row.current_value, row.target_value),
                    )
                    .map_err(|_| ImportError::UnknownVenture {
                        venture_id: row.venture_id,
                    })?;
                metric_count += 1;
            }
        }

        info!(
            ventures = repository.len(),
            metrics = metric_count,
            "intake export loaded"
        );
        Ok(repository)
    }
}
