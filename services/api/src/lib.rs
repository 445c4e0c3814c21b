mod cli;
mod infra;
mod reports;
mod routes;
mod server;

use venture_impact::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
