pub mod config;
pub mod error;
pub mod import;
pub mod portfolio;
pub mod recalculation;
pub mod scoring;
pub mod telemetry;
