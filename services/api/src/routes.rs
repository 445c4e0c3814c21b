use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use venture_impact::recalculation::{
    recalculation_router, RecalculationServices, VentureRepository,
};

pub(crate) fn with_service_routes<R>(services: Arc<RecalculationServices<R>>) -> axum::Router
where
    R: VentureRepository + 'static,
{
    recalculation_router(services)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{build_orchestrator, sample_repository};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;
    use venture_impact::config::{AppConfig, AppEnvironment, ServerConfig, TelemetryConfig};
    use venture_impact::portfolio::PortfolioReporter;
    use venture_impact::recalculation::RecalculationTrigger;

    fn test_config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            scoring: Default::default(),
            recalculation: Default::default(),
        }
    }

    fn app(ready: bool) -> axum::Router {
        let repository = Arc::new(sample_repository().expect("sample data parses"));
        let orchestrator = build_orchestrator(&test_config(), Arc::clone(&repository));
        let services = Arc::new(RecalculationServices {
            trigger: RecalculationTrigger::new(orchestrator),
            portfolio: PortfolioReporter::new(repository),
        });
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(services).layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn scoring_routes_are_mounted_next_to_probes() {
        let (status, body) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = get(app(true), "/api/v1/ventures/vn-agri-001/scores").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["gedsi_score"], 55);

        let (status, body) = get(app(true), "/api/v1/portfolio").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["venture_count"], 5);
        assert_eq!(body["calculated_count"], 0);
    }
}
