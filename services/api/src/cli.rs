use crate::reports::{run_portfolio, run_preview, run_recompute, PreviewArgs, RecomputeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use venture_impact::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Venture Impact Engine",
    about = "Score portfolio ventures and keep their GEDSI and social impact metrics fresh",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service with the hourly recalculation schedule (default command)
    Serve(ServeArgs),
    /// Recompute one venture, or the whole portfolio, and print the outcome
    Recompute(RecomputeArgs),
    /// Recompute every venture and print portfolio totals and averages
    Portfolio(SourceArgs),
    /// Score a venture without persisting the result
    Preview(PreviewArgs),
}

/// Where venture source data is read from. Without a CSV the bundled sample portfolio is used.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SourceArgs {
    /// Intake export with one row per venture
    #[arg(long)]
    pub(crate) ventures_csv: Option<PathBuf>,
    /// Optional GEDSI metric export keyed by venture_id
    #[arg(long, requires = "ventures_csv")]
    pub(crate) metrics_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recompute(args) => run_recompute(args).await,
        Command::Portfolio(args) => run_portfolio(args).await,
        Command::Preview(args) => run_preview(args),
    }
}
