use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::definition::AssessmentDefinition;
use super::domain::{AssessmentId, ResponseSet, StudentId};
use super::repository::{AttemptRepository, CompletionNotifier, RepositoryError};
use super::scoring::ScoringError;
use super::service::{AssessmentService, AssessmentServiceError};

type SharedService<R, N> = Arc<AssessmentService<R, N>>;

#[derive(Debug, Deserialize)]
pub struct SaveProgressRequest {
    pub responses: ResponseSet,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    #[serde(default)]
    pub total_time_seconds: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub definition: AssessmentDefinition,
    pub responses: ResponseSet,
}

const ATTEMPT_PATH: &str = "/api/v1/students/:student_id/assessments/:assessment_id/attempt";

/// Router builder exposing the catalog, stateless scoring, and the attempt lifecycle.
pub fn assessment_router<R, N>(service: SharedService<R, N>) -> Router
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    Router::new()
        .route("/api/v1/assessments", get(catalog_handler::<R, N>))
        .route(
            "/api/v1/assessments/:assessment_id",
            get(definition_handler::<R, N>),
        )
        .route("/api/v1/score", post(score_handler::<R, N>))
        .route(
            ATTEMPT_PATH,
            post(start_handler::<R, N>).get(status_handler::<R, N>),
        )
        .route(
            &format!("{ATTEMPT_PATH}/responses"),
            put(save_progress_handler::<R, N>),
        )
        .route(
            &format!("{ATTEMPT_PATH}/validation"),
            get(validation_handler::<R, N>),
        )
        .route(
            &format!("{ATTEMPT_PATH}/complete"),
            post(complete_handler::<R, N>),
        )
        .route(
            &format!("{ATTEMPT_PATH}/results"),
            get(results_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn catalog_handler<R, N>(State(service): State<SharedService<R, N>>) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    let summaries = service.catalog().summaries();
    (StatusCode::OK, Json(json!({ "assessments": summaries }))).into_response()
}

pub(crate) async fn definition_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    match service.definition(&AssessmentId(assessment_id)) {
        Ok(definition) => (StatusCode::OK, Json(definition)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Json(request): Json<ScoreRequest>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    match service.score(&request.definition, &request.responses) {
        Ok(scores) => {
            let insights = service.insights(&scores);
            let payload = json!({
                "scores": scores,
                "insights": insights,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path((student_id, assessment_id)): Path<(String, String)>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    let student_id = StudentId(student_id);
    let assessment_id = AssessmentId(assessment_id);
    let started = service
        .start(student_id.clone(), assessment_id.clone())
        .and_then(|(_, created)| {
            service
                .status(student_id, assessment_id)
                .map(|view| (view, created))
        });

    match started {
        Ok((view, true)) => (StatusCode::CREATED, Json(view)).into_response(),
        Ok((view, false)) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path((student_id, assessment_id)): Path<(String, String)>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    match service.status(StudentId(student_id), AssessmentId(assessment_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn save_progress_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path((student_id, assessment_id)): Path<(String, String)>,
    Json(request): Json<SaveProgressRequest>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    match service.save_progress(
        StudentId(student_id),
        AssessmentId(assessment_id),
        &request.responses,
    ) {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn validation_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path((student_id, assessment_id)): Path<(String, String)>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    match service.validation(StudentId(student_id), AssessmentId(assessment_id)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path((student_id, assessment_id)): Path<(String, String)>,
    Json(request): Json<CompleteRequest>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    match service.complete(
        StudentId(student_id),
        AssessmentId(assessment_id),
        request.total_time_seconds,
    ) {
        Ok(scores) => (StatusCode::OK, Json(scores)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn results_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path((student_id, assessment_id)): Path<(String, String)>,
) -> Response
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    match service.results(StudentId(student_id), AssessmentId(assessment_id)) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: AssessmentServiceError) -> Response {
    let (status, payload) = match &err {
        AssessmentServiceError::UnknownAssessment(_) | AssessmentServiceError::NotFound => {
            (StatusCode::NOT_FOUND, json!({ "error": err.to_string() }))
        }
        AssessmentServiceError::AlreadyCompleted
        | AssessmentServiceError::NotCompleted
        | AssessmentServiceError::Repository(RepositoryError::StaleRevision { .. })
        | AssessmentServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, json!({ "error": err.to_string() }))
        }
        AssessmentServiceError::IncompleteInput(report) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": err.to_string(),
                "answered": report.answered_count,
                "total": report.total_count,
                "missing_questions": report.missing_questions,
            }),
        ),
        AssessmentServiceError::Scoring(ScoringError::IncompleteInput { missing, total }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": err.to_string(),
                "answered": total.saturating_sub(missing.len()),
                "total": total,
                "missing_questions": missing,
            }),
        ),
        AssessmentServiceError::Rejected(_) | AssessmentServiceError::Scoring(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": err.to_string() }),
        ),
        AssessmentServiceError::Repository(_) => {
            tracing::error!(error = %err, "attempt repository failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": err.to_string() }),
            )
        }
    };

    (status, Json(payload)).into_response()
}
