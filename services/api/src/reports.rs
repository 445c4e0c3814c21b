use crate::cli::SourceArgs;
use crate::infra::{build_orchestrator, load_repository};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use venture_impact::config::AppConfig;
use venture_impact::error::AppError;
use venture_impact::portfolio::{PortfolioReporter, PortfolioSnapshot};
use venture_impact::recalculation::{RecalculationSummary, VentureRepository};
use venture_impact::scoring::{MaterializedMetrics, ScoreSnapshot, VentureId};

#[derive(Args, Debug)]
pub(crate) struct RecomputeArgs {
    /// Recompute a single venture instead of the whole portfolio
    #[arg(long)]
    pub(crate) venture: Option<String>,
    /// Emit JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Venture identifier to score
    pub(crate) venture: String,
    /// Emit JSON instead of the text summary
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct PreviewReport {
    score: ScoreSnapshot,
    stored: MaterializedMetrics,
}

pub(crate) async fn run_recompute(args: RecomputeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let repository = Arc::new(load_repository(&args.source)?);
    let orchestrator = build_orchestrator(&config, repository);

    match args.venture {
        Some(raw) => {
            let id = VentureId::new(raw);
            let fields = orchestrator.recompute_one(&id)?;
            if args.json {
                print_json(&fields);
            } else {
                println!("Recomputed venture {id}");
                render_materialized(&fields);
            }
        }
        None => {
            let summary = orchestrator.recompute_all().await?;
            if args.json {
                print_json(&summary);
            } else {
                render_summary(&summary);
            }
        }
    }

    Ok(())
}

pub(crate) async fn run_portfolio(source: SourceArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let repository = Arc::new(load_repository(&source)?);
    let orchestrator = build_orchestrator(&config, Arc::clone(&repository));

    let summary = orchestrator.recompute_all().await?;
    render_summary(&summary);

    let snapshot = PortfolioReporter::new(repository).portfolio_metrics();
    render_portfolio(&snapshot);
    Ok(())
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let repository = Arc::new(load_repository(&args.source)?);
    let orchestrator = build_orchestrator(&config, Arc::clone(&repository));

    let id = VentureId::new(args.venture);
    let score = orchestrator.compute_one(&id)?;
    let stored = repository
        .fetch(&id)
        .ok()
        .flatten()
        .map(|snapshot| snapshot.venture.materialized)
        .unwrap_or_default();

    if args.json {
        print_json(&PreviewReport { score, stored });
        return Ok(());
    }

    println!("Score preview for venture {id} (not persisted)");
    println!(
        "- GEDSI score {} via {} | compliance {}%",
        score.gedsi_score,
        score.gedsi_source.label(),
        score.gedsi_compliance_rate
    );
    println!("- Social impact score {}", score.social_impact_score);
    println!(
        "- {} beneficiaries | {} jobs | {} women | {} disability inclusive | {} youth",
        score.impact.total_beneficiaries,
        score.impact.jobs_created,
        score.impact.women_empowered,
        score.impact.disability_inclusive,
        score.impact.youth_engaged
    );
    if score.founder_types_malformed {
        println!("- Founder tags could not be parsed; no founder bonus applied");
    }
    match stored.calculated_at {
        Some(at) => println!(
            "Stored values from {}: GEDSI {} | impact {}",
            at.to_rfc3339(),
            stored.gedsi_score,
            stored.social_impact_score
        ),
        None => println!("No stored values yet"),
    }
    Ok(())
}

fn render_materialized(fields: &MaterializedMetrics) {
    println!(
        "- GEDSI {} | social impact {} | compliance {}%",
        fields.gedsi_score, fields.social_impact_score, fields.gedsi_compliance_rate
    );
    println!(
        "- {} beneficiaries | {} jobs created",
        fields.total_beneficiaries, fields.jobs_created
    );
    if let Some(at) = fields.calculated_at {
        println!("- calculated at {}", at.to_rfc3339());
    }
}

fn render_summary(summary: &RecalculationSummary) {
    println!(
        "Recalculation finished: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    for failure in &summary.failures {
        println!("  - {}: {}", failure.id, failure.reason);
    }
}

fn render_portfolio(snapshot: &PortfolioSnapshot) {
    println!(
        "\nPortfolio ({} ventures, {} calculated)",
        snapshot.venture_count, snapshot.calculated_count
    );
    println!(
        "- {} beneficiaries | {} jobs | {} women | {} disability inclusive | {} youth",
        snapshot.total_beneficiaries,
        snapshot.total_jobs_created,
        snapshot.total_women_empowered,
        snapshot.total_disability_inclusive,
        snapshot.total_youth_engaged
    );
    println!(
        "- Average GEDSI {} | average social impact {} | average compliance {}%",
        snapshot.average_gedsi_score,
        snapshot.average_social_impact_score,
        snapshot.average_compliance_rate
    );
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render JSON output: {err}"),
    }
}
