use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::config::SourceDataPolicy;
use crate::portfolio::PortfolioReporter;
use crate::recalculation::{
    recalculation_router, InMemoryVentureRepository, RecalculationServices, RecalculationTrigger,
};
use crate::scoring::domain::VentureId;

fn router(repository: &Arc<InMemoryVentureRepository>) -> axum::Router {
    let services = RecalculationServices {
        trigger: RecalculationTrigger::new(orchestrator(
            Arc::clone(repository),
            SourceDataPolicy::Strict,
        )),
        portfolio: PortfolioReporter::new(Arc::clone(repository)),
    };
    recalculation_router(Arc::new(services))
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn preview_returns_scores_without_persisting() {
    let repository = seeded_repository();
    let response = router(&repository)
        .oneshot(request("GET", "/api/v1/ventures/v-1/scores"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["venture_id"], "v-1");
    assert_eq!(body["impact"]["total_beneficiaries"], 1300);
    assert_eq!(body["gedsi_source"], "metric_ratio_average");
    assert!(!materialized(&repository, "v-1").is_calculated());
}

#[tokio::test]
async fn preview_of_unknown_venture_is_not_found() {
    let repository = seeded_repository();
    let response = router(&repository)
        .oneshot(request("GET", "/api/v1/ventures/ghost/scores"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["venture_id"], "ghost");
}

#[tokio::test]
async fn trigger_route_accepts_immediately() {
    let repository = seeded_repository();
    let response = router(&repository)
        .oneshot(request("POST", "/api/v1/ventures/ghost/recalculate"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "scheduled");
}

#[tokio::test]
async fn bulk_route_returns_summary_then_portfolio_reflects_it() {
    let repository = seeded_repository();
    let app = router(&repository);

    let response = app
        .clone()
        .oneshot(request("POST", "/api/v1/recalculate"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let summary = read_json_body(response).await;
    assert_eq!(summary["succeeded"], 3);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["failures"][0]["id"], "v-3");

    let response = app
        .oneshot(request("GET", "/api/v1/portfolio"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let portfolio = read_json_body(response).await;
    assert_eq!(portfolio["venture_count"], 4);
    assert_eq!(portfolio["calculated_count"], 3);
    assert_eq!(portfolio["total_beneficiaries"], 3900);
}

#[tokio::test]
async fn preview_reports_failed_read_without_tearing_down_handler() {
    let store = seeded_repository();
    let mut faulty = FaultyRepository::wrapping(&store);
    faulty.panic_on_fetch.insert(VentureId::new("v-1"));
    let faulty = Arc::new(faulty);
    let services = RecalculationServices {
        trigger: RecalculationTrigger::new(orchestrator(
            Arc::clone(&faulty),
            SourceDataPolicy::Lenient,
        )),
        portfolio: PortfolioReporter::new(faulty),
    };
    let app = recalculation_router(Arc::new(services));

    let response = app
        .clone()
        .oneshot(request("GET", "/api/v1/ventures/v-1/scores"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.contains("aborted")));

    let response = app
        .oneshot(request("GET", "/api/v1/portfolio"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["venture_count"], 4);
}
