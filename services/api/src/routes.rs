use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use careerpath::assessment::{
    assessment_router, AssessmentService, AttemptRepository, CompletionNotifier, ResponseImporter,
    ResponseSet,
};
use careerpath::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseImportRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseImportResponse {
    pub(crate) count: usize,
    pub(crate) responses: ResponseSet,
}

pub(crate) fn with_assessment_routes<R, N>(service: Arc<AssessmentService<R, N>>) -> axum::Router
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/responses/import",
            axum::routing::post(response_import_endpoint),
        )
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

/// Convert a `question_id,rating` CSV export into the JSON shape accepted by progress saves.
pub(crate) async fn response_import_endpoint(
    Json(payload): Json<ResponseImportRequest>,
) -> Result<Json<ResponseImportResponse>, AppError> {
    let reader = Cursor::new(payload.csv.into_bytes());
    let responses = ResponseImporter::from_reader(reader)?;

    Ok(Json(ResponseImportResponse {
        count: responses.len(),
        responses,
    }))
}
