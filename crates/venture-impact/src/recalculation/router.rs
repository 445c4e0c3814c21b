use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::repository::VentureRepository;
use super::trigger::RecalculationTrigger;
use super::RecalculationError;
use crate::portfolio::PortfolioReporter;
use crate::scoring::domain::VentureId;

/// Shared state behind the recalculation routes.
pub struct RecalculationServices<R> {
    pub trigger: RecalculationTrigger<R>,
    pub portfolio: PortfolioReporter<R>,
}

/// Router exposing score preview, recompute triggers and portfolio metrics.
pub fn recalculation_router<R>(services: Arc<RecalculationServices<R>>) -> Router
where
    R: VentureRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/ventures/:venture_id/scores",
            get(preview_handler::<R>),
        )
        .route(
            "/api/v1/ventures/:venture_id/recalculate",
            post(trigger_handler::<R>),
        )
        .route("/api/v1/recalculate", post(recompute_all_handler::<R>))
        .route("/api/v1/portfolio", get(portfolio_handler::<R>))
        .with_state(services)
}

pub(crate) async fn preview_handler<R>(
    State(services): State<Arc<RecalculationServices<R>>>,
    Path(venture_id): Path<String>,
) -> Response
where
    R: VentureRepository + 'static,
{
    let id = VentureId(venture_id);
    let orchestrator = services.trigger.orchestrator().clone();
    let task_id = id.clone();
    let outcome = tokio::task::spawn_blocking(move || orchestrator.compute_one(&task_id))
        .await
        .unwrap_or_else(|join| {
            Err(RecalculationError::TaskAborted {
                id: id.clone(),
                detail: join.to_string(),
            })
        });

    match outcome {
        Ok(score) => (StatusCode::OK, axum::Json(score)).into_response(),
        Err(RecalculationError::NotFound(_)) => {
            let payload = json!({
                "error": "venture not found",
                "venture_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn trigger_handler<R>(
    State(services): State<Arc<RecalculationServices<R>>>,
    Path(venture_id): Path<String>,
) -> Response
where
    R: VentureRepository + 'static,
{
    let id = VentureId(venture_id);
    services.trigger.trigger_async(id.clone());
    let payload = json!({
        "venture_id": id.0,
        "status": "scheduled",
    });
    (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
}

pub(crate) async fn recompute_all_handler<R>(
    State(services): State<Arc<RecalculationServices<R>>>,
) -> Response
where
    R: VentureRepository + 'static,
{
    match services.trigger.orchestrator().recompute_all().await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn portfolio_handler<R>(
    State(services): State<Arc<RecalculationServices<R>>>,
) -> Response
where
    R: VentureRepository + 'static,
{
    let reporter = services.portfolio.clone();
    match tokio::task::spawn_blocking(move || reporter.portfolio_metrics()).await {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(join) => {
            let payload = json!({
                "error": join.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
