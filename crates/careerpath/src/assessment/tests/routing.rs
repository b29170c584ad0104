use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::assessment::router::{complete_handler, start_handler, CompleteRequest};
use crate::assessment::{AssessmentCatalog, AssessmentService, InMemoryAttemptRepository};
use crate::config::ScoringConfig;

#[tokio::test]
async fn catalog_route_lists_standard_assessments() {
    let service = AssessmentService::new(
        Arc::new(AssessmentCatalog::standard()),
        Arc::new(InMemoryAttemptRepository::default()),
        Arc::new(MemoryNotifier::default()),
        &ScoringConfig::default(),
    );
    let router = router_with_service(service);

    let response = router
        .oneshot(empty_request(Method::GET, "/api/v1/assessments"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let assessments = payload["assessments"].as_array().expect("list");
    assert_eq!(assessments.len(), 2);
    assert_eq!(assessments[0]["id"], "career-discovery");
    assert_eq!(assessments[1]["variant"], "pilot");
}

#[tokio::test]
async fn definition_route_returns_not_found_for_unknown_ids() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let found = router
        .clone()
        .oneshot(empty_request(Method::GET, "/api/v1/assessments/riasec"))
        .await
        .expect("route executes");
    let missing = router
        .oneshot(empty_request(Method::GET, "/api/v1/assessments/tarot"))
        .await
        .expect("route executes");

    assert_eq!(found.status(), StatusCode::OK);
    let payload = read_json_body(found).await;
    assert_eq!(payload["questions"].as_array().map(Vec::len), Some(12));
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn start_handler_creates_then_resumes() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let path = || Path((STUDENT.to_string(), TWO_DOMAIN.to_string()));

    let created = start_handler::<InMemoryAttemptRepository, MemoryNotifier>(
        State(service.clone()),
        path(),
    )
    .await;
    let resumed =
        start_handler::<InMemoryAttemptRepository, MemoryNotifier>(State(service), path()).await;

    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(resumed.status(), StatusCode::OK);
    let payload = read_json_body(resumed).await;
    assert_eq!(payload["status"], "IN_PROGRESS");
    assert_eq!(payload["progress"]["total"], 4);
}

#[tokio::test]
async fn attempt_lifecycle_over_http() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let started = router
        .clone()
        .oneshot(empty_request(Method::POST, &attempt_path(RIASEC, "")))
        .await
        .expect("route executes");
    assert_eq!(started.status(), StatusCode::CREATED);

    let saved = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &attempt_path(RIASEC, "/responses"),
            &json!({ "responses": irs_responses() }),
        ))
        .await
        .expect("route executes");
    assert_eq!(saved.status(), StatusCode::OK);
    let progress = read_json_body(saved).await;
    assert_eq!(progress, json!({ "answered": 12, "total": 12, "percentage": 100 }));

    let validation = router
        .clone()
        .oneshot(empty_request(
            Method::GET,
            &attempt_path(RIASEC, "/validation"),
        ))
        .await
        .expect("route executes");
    assert_eq!(read_json_body(validation).await["is_complete"], true);

    let completed = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &attempt_path(RIASEC, "/complete"),
            &json!({ "total_time_seconds": 640 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(completed.status(), StatusCode::OK);
    let card = read_json_body(completed).await;
    assert_eq!(card["holland_code"], "IRS");
    assert_eq!(card["sections"][0]["kind"], "composite");

    let again = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &attempt_path(RIASEC, "/complete"),
            &json!({}),
        ))
        .await
        .expect("route executes");
    assert_eq!(again.status(), StatusCode::CONFLICT);

    let results = router
        .oneshot(empty_request(Method::GET, &attempt_path(RIASEC, "/results")))
        .await
        .expect("route executes");
    assert_eq!(results.status(), StatusCode::OK);
    let payload = read_json_body(results).await;
    assert_eq!(payload["attempt"]["status"], "COMPLETED");
    assert_eq!(payload["attempt"]["total_time_seconds"], 640);
    assert_eq!(payload["insights"]["strengths"][0]["id"], "I");
}

#[tokio::test]
async fn save_route_maps_rejections() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let before_start = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &attempt_path(TWO_DOMAIN, "/responses"),
            &json!({ "responses": { "a1": 3 } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(before_start.status(), StatusCode::NOT_FOUND);

    router
        .clone()
        .oneshot(empty_request(Method::POST, &attempt_path(TWO_DOMAIN, "")))
        .await
        .expect("route executes");

    let unknown = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &attempt_path(TWO_DOMAIN, "/responses"),
            &json!({ "responses": { "q404": 3 } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let out_of_range = router
        .oneshot(json_request(
            Method::PUT,
            &attempt_path(TWO_DOMAIN, "/responses"),
            &json!({ "responses": { "a1": 7 } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(out_of_range.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn incomplete_completion_reports_missing_questions() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    service
        .start(student(), assessment(TWO_DOMAIN))
        .expect("attempt starts");
    service
        .save_progress(
            student(),
            assessment(TWO_DOMAIN),
            &crate::assessment::ResponseSet::from([("a1", 3), ("b2", 3)]),
        )
        .expect("save");

    let response = complete_handler::<InMemoryAttemptRepository, MemoryNotifier>(
        State(service),
        Path((STUDENT.to_string(), TWO_DOMAIN.to_string())),
        axum::Json(CompleteRequest::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["answered"], 2);
    assert_eq!(payload["total"], 4);
    assert_eq!(payload["missing_questions"], json!(["a2", "b1"]));
}

#[tokio::test]
async fn results_before_completion_conflict() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    router
        .clone()
        .oneshot(empty_request(Method::POST, &attempt_path(TWO_DOMAIN, "")))
        .await
        .expect("route executes");
    let response = router
        .oneshot(empty_request(
            Method::GET,
            &attempt_path(TWO_DOMAIN, "/results"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn score_route_is_stateless() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let scored = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/score",
            &json!({
                "definition": holland_definition(),
                "responses": irs_responses(),
            }),
        ))
        .await
        .expect("route executes");
    let incomplete = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/score",
            &json!({
                "definition": holland_definition(),
                "responses": { "r1": 3 },
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(scored.status(), StatusCode::OK);
    let payload = read_json_body(scored).await;
    assert_eq!(payload["scores"]["holland_code"], "IRS");
    assert_eq!(incomplete.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(read_json_body(incomplete).await["total"], 12);
    assert!(repository.is_empty());
}

#[tokio::test]
async fn start_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(service_with(
        UnavailableRepository,
        MemoryNotifier::default(),
    ));

    let response = start_handler::<UnavailableRepository, MemoryNotifier>(
        State(service),
        Path((STUDENT.to_string(), TWO_DOMAIN.to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
