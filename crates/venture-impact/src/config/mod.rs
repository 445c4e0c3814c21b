use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub recalculation: RecalculationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let founder_bonus_ceiling = match env::var("SCORING_FOUNDER_BONUS_CEILING") {
            Ok(raw) if !raw.trim().is_empty() => {
                let ceiling = raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite() && *value >= 1.0)
                    .ok_or(ConfigError::InvalidBonusCeiling { value: raw.clone() })?;
                Some(ceiling)
            }
            _ => None,
        };

        let worker_count = parse_positive("RECALC_WORKERS", 4)?;
        let trigger_timeout_ms = parse_positive("RECALC_TRIGGER_TIMEOUT_MS", 30_000)?;
        let entity_timeout_ms = parse_positive("RECALC_ENTITY_TIMEOUT_MS", 30_000)?;
        let schedule_secs = parse_positive("RECALC_SCHEDULE_SECS", 3_600)?;
        let source_policy = match env::var("RECALC_SOURCE_POLICY") {
            Ok(raw) => SourceDataPolicy::parse(&raw)?,
            Err(_) => SourceDataPolicy::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                founder_bonus_ceiling,
            },
            recalculation: RecalculationConfig {
                worker_count: worker_count as usize,
                trigger_timeout: Duration::from_millis(trigger_timeout_ms),
                entity_timeout: Duration::from_millis(entity_timeout_ms),
                schedule_interval: Duration::from_secs(schedule_secs),
                source_policy,
            },
        })
    }
}

fn parse_positive(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or(ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for the score computation core.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringConfig {
    /// Upper bound applied to the additive founder-type bonus. `None` leaves it uncapped.
    pub founder_bonus_ceiling: Option<f64>,
}

/// How the orchestrator treats founder tags that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceDataPolicy {
    /// Degrade to an empty tag set and persist as usual.
    #[default]
    Lenient,
    /// Refuse to persist; the venture keeps its previous materialized fields.
    Strict,
}

impl SourceDataPolicy {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(ConfigError::InvalidPolicy {
                value: value.to_string(),
            }),
        }
    }
}

/// Controls for the recalculation orchestrator and its triggers.
#[derive(Debug, Clone, PartialEq)]
pub struct RecalculationConfig {
    pub worker_count: usize,
    pub trigger_timeout: Duration,
    /// Budget for one venture inside a bulk recompute; overrunning work is abandoned unwritten.
    pub entity_timeout: Duration,
    pub schedule_interval: Duration,
    pub source_policy: SourceDataPolicy,
}

impl Default for RecalculationConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            trigger_timeout: Duration::from_secs(30),
            entity_timeout: Duration::from_secs(30),
            schedule_interval: Duration::from_secs(3_600),
            source_policy: SourceDataPolicy::Lenient,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidBonusCeiling { value: String },
    InvalidPolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a positive integer (found '{value}')")
            }
            ConfigError::InvalidBonusCeiling { value } => write!(
                f,
                "SCORING_FOUNDER_BONUS_CEILING must be a number >= 1.0 (found '{value}')"
            ),
            ConfigError::InvalidPolicy { value } => write!(
                f,
                "RECALC_SOURCE_POLICY must be 'lenient' or 'strict' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidBonusCeiling { .. }
            | ConfigError::InvalidPolicy { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SCORING_FOUNDER_BONUS_CEILING",
            "RECALC_WORKERS",
            "RECALC_TRIGGER_TIMEOUT_MS",
            "RECALC_ENTITY_TIMEOUT_MS",
            "RECALC_SCHEDULE_SECS",
            "RECALC_SOURCE_POLICY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring.founder_bonus_ceiling, None);
        assert_eq!(config.recalculation, RecalculationConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_recalculation_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RECALC_WORKERS", "8");
        env::set_var("RECALC_SOURCE_POLICY", "Strict");
        env::set_var("SCORING_FOUNDER_BONUS_CEILING", "1.5");
        env::set_var("RECALC_ENTITY_TIMEOUT_MS", "250");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.recalculation.worker_count, 8);
        assert_eq!(
            config.recalculation.entity_timeout,
            Duration::from_millis(250)
        );
        assert_eq!(config.recalculation.source_policy, SourceDataPolicy::Strict);
        assert_eq!(config.scoring.founder_bonus_ceiling, Some(1.5));
        reset_env();
    }

    #[test]
    fn rejects_zero_workers_and_low_ceiling() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RECALC_WORKERS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                key: "RECALC_WORKERS",
                ..
            })
        ));
        reset_env();
        env::set_var("SCORING_FOUNDER_BONUS_CEILING", "0.5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidBonusCeiling { .. })
        ));
        reset_env();
    }

    #[test]
    fn rejects_unknown_source_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RECALC_SOURCE_POLICY", "stirct");
        match AppConfig::load() {
            Err(ConfigError::InvalidPolicy { value }) => assert_eq!(value, "stirct"),
            other => panic!("expected policy error, got {other:?}"),
        }
        reset_env();
        env::set_var("RECALC_SOURCE_POLICY", " Lenient ");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.recalculation.source_policy, SourceDataPolicy::Lenient);
        reset_env();
    }
}
