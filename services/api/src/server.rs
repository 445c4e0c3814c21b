use crate::cli::ServeArgs;
use crate::infra::{build_orchestrator, load_repository, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use venture_impact::config::AppConfig;
use venture_impact::error::AppError;
use venture_impact::portfolio::PortfolioReporter;
use venture_impact::recalculation::{RecalculationServices, RecalculationTrigger};
use venture_impact::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(load_repository(&args.source)?);
    let trigger = RecalculationTrigger::new(build_orchestrator(&config, Arc::clone(&repository)));
    let schedule = trigger.spawn_schedule(config.recalculation.schedule_interval);
    let services = Arc::new(RecalculationServices {
        trigger,
        portfolio: PortfolioReporter::new(repository),
    });

    let app = with_service_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        workers = config.recalculation.worker_count,
        schedule_secs = config.recalculation.schedule_interval.as_secs(),
        "venture impact engine ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    schedule.abort();
    info!("venture impact engine stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
