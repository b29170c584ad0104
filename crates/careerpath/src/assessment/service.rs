use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use super::catalog::AssessmentCatalog;
use super::definition::AssessmentDefinition;
use super::domain::{elapsed_seconds, AssessmentId, AttemptId, ProgressView, ResponseSet, StudentId};
use super::insights::ResultInsights;
use super::repository::{
    AssessmentCompleted, AttemptKey, AttemptRecord, AttemptRepository, AttemptStatusView,
    Completion, CompletionNotifier, RepositoryError,
};
use super::scoring::{BandingConfig, ScoreCard, ScoringEngine, ScoringError};
use super::validation::{check_partial, validate, ResponseRejection, ValidationReport};
use crate::config::ScoringConfig;

/// Service composing the catalog, attempt repository, scoring engine, and completion hook.
pub struct AssessmentService<R, N> {
    catalog: Arc<AssessmentCatalog>,
    repository: Arc<R>,
    notifier: Arc<N>,
    engine: Arc<ScoringEngine>,
    insight_limit: usize,
}

static ATTEMPT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_attempt_id() -> AttemptId {
    let id = ATTEMPT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AttemptId(format!("att-{id:06}"))
}

/// Completed attempt together with its persisted scores and derived insights.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResults {
    pub attempt: AttemptStatusView,
    pub scores: ScoreCard,
    pub insights: ResultInsights,
}

impl<R, N> AssessmentService<R, N>
where
    R: AttemptRepository + 'static,
    N: CompletionNotifier + 'static,
{
    pub fn new(
        catalog: Arc<AssessmentCatalog>,
        repository: Arc<R>,
        notifier: Arc<N>,
        config: &ScoringConfig,
    ) -> Self {
        let engine = ScoringEngine::new(BandingConfig::standard(), config);
        Self::with_engine(catalog, repository, notifier, engine, config.insight_limit)
    }

    pub fn with_engine(
        catalog: Arc<AssessmentCatalog>,
        repository: Arc<R>,
        notifier: Arc<N>,
        engine: ScoringEngine,
        insight_limit: usize,
    ) -> Self {
        Self {
            catalog,
            repository,
            notifier,
            engine: Arc::new(engine),
            insight_limit,
        }
    }

    pub fn catalog(&self) -> &AssessmentCatalog {
        &self.catalog
    }

    pub fn definition(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<&AssessmentDefinition, AssessmentServiceError> {
        self.catalog
            .get(assessment_id)
            .ok_or_else(|| AssessmentServiceError::UnknownAssessment(assessment_id.clone()))
    }

    /// Open an attempt, or return the one the student already has for this assessment.
    pub fn start(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
    ) -> Result<(AttemptRecord, bool), AssessmentServiceError> {
        self.definition(&assessment_id)?;
        let key = AttemptKey::new(student_id, assessment_id);

        if let Some(existing) = self.repository.fetch(&key)? {
            return Ok((existing, false));
        }

        let record = AttemptRecord::new(next_attempt_id(), key.clone(), Utc::now());
        match self.repository.insert(record) {
            Ok(stored) => {
                tracing::info!(
                    attempt_id = %stored.attempt_id.0,
                    student_id = %stored.key.student_id,
                    assessment_id = %stored.key.assessment_id,
                    "assessment attempt started"
                );
                Ok((stored, true))
            }
            // Lost a race with a concurrent start; the winner's record is the attempt.
            Err(RepositoryError::Conflict) => {
                let existing = self
                    .repository
                    .fetch(&key)?
                    .ok_or(RepositoryError::NotFound)?;
                Ok((existing, false))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Merge a partial response map into the stored attempt and report progress.
    pub fn save_progress(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
        partial: &ResponseSet,
    ) -> Result<ProgressView, AssessmentServiceError> {
        let definition = self.definition(&assessment_id)?;
        check_partial(partial, definition)?;

        let key = AttemptKey::new(student_id, assessment_id);
        let record = self.repository.merge_responses(&key, partial, Utc::now())?;
        let report = validate(&record.responses, definition);

        tracing::debug!(
            attempt_id = %record.attempt_id.0,
            answered = report.answered_count,
            total = report.total_count,
            "responses saved"
        );

        Ok(report.progress())
    }

    pub fn get(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
    ) -> Result<AttemptRecord, AssessmentServiceError> {
        self.definition(&assessment_id)?;
        let key = AttemptKey::new(student_id, assessment_id);
        let record = self
            .repository
            .fetch(&key)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn status(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
    ) -> Result<AttemptStatusView, AssessmentServiceError> {
        let definition = self.definition(&assessment_id)?;
        let record = self.get(student_id, assessment_id)?;
        let progress = validate(&record.responses, definition).progress();
        Ok(record.status_view(progress))
    }

    pub fn validation(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
    ) -> Result<ValidationReport, AssessmentServiceError> {
        let definition = self.definition(&assessment_id)?;
        let record = self.get(student_id, assessment_id)?;
        Ok(validate(&record.responses, definition))
    }

    /// Score the stored responses and finalize the attempt.
    ///
    /// Finalization succeeds once per attempt. A save that lands between scoring and the
    /// write surfaces as a stale revision instead of persisting scores for older responses.
    pub fn complete(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
        total_time_seconds: Option<u32>,
    ) -> Result<ScoreCard, AssessmentServiceError> {
        let definition = self.definition(&assessment_id)?;
        let record = self.get(student_id, assessment_id)?;
        if record.status.is_terminal() {
            return Err(AssessmentServiceError::AlreadyCompleted);
        }

        let report = validate(&record.responses, definition);
        if !report.is_complete {
            tracing::debug!(
                attempt_id = %record.attempt_id.0,
                missing = report.missing_questions.len(),
                "completion refused, responses incomplete"
            );
            return Err(AssessmentServiceError::IncompleteInput(report));
        }

        let scores = self.engine.score(definition, &record.responses)?;
        let completed_at = Utc::now();
        let total_time_seconds = total_time_seconds
            .unwrap_or_else(|| elapsed_seconds(record.started_at, completed_at));

        let stored = self.repository.complete(
            &record.key,
            record.revision,
            Completion {
                scores: scores.clone(),
                completed_at,
                total_time_seconds,
            },
        )?;

        tracing::info!(
            attempt_id = %stored.attempt_id.0,
            assessment_id = %stored.key.assessment_id,
            holland_code = scores.holland_code.as_deref().unwrap_or("-"),
            total_time_seconds,
            "assessment completed"
        );

        let event = AssessmentCompleted {
            attempt_id: stored.attempt_id.clone(),
            student_id: stored.key.student_id.clone(),
            assessment_id: stored.key.assessment_id.clone(),
            holland_code: scores.holland_code.clone(),
            completed_at,
        };
        // Scores are already persisted; a failed hook must not turn the completion into an error.
        if let Err(err) = self.notifier.notify(event) {
            tracing::warn!(
                attempt_id = %stored.attempt_id.0,
                error = %err,
                "completion notification failed"
            );
        }

        Ok(scores)
    }

    /// Persisted scores plus strengths and growth areas for a completed attempt.
    pub fn results(
        &self,
        student_id: StudentId,
        assessment_id: AssessmentId,
    ) -> Result<AssessmentResults, AssessmentServiceError> {
        let definition = self.definition(&assessment_id)?;
        let record = self.get(student_id, assessment_id)?;
        let scores = match (&record.scores, record.status.is_terminal()) {
            (Some(scores), true) => scores.clone(),
            _ => return Err(AssessmentServiceError::NotCompleted),
        };

        let insights = ResultInsights::from_card(&scores, self.insight_limit);
        let progress = validate(&record.responses, definition).progress();
        Ok(AssessmentResults {
            attempt: record.status_view(progress),
            scores,
            insights,
        })
    }

    /// Score a caller-supplied definition without touching any stored attempt.
    pub fn score(
        &self,
        definition: &AssessmentDefinition,
        responses: &ResponseSet,
    ) -> Result<ScoreCard, AssessmentServiceError> {
        Ok(self.engine.score(definition, responses)?)
    }

    pub fn insights(&self, scores: &ScoreCard) -> ResultInsights {
        ResultInsights::from_card(scores, self.insight_limit)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("assessment {0} is not in the catalog")]
    UnknownAssessment(AssessmentId),
    #[error("attempt not found")]
    NotFound,
    #[error("attempt already completed")]
    AlreadyCompleted,
    #[error("attempt has not been completed")]
    NotCompleted,
    #[error(
        "responses incomplete: {} of {} questions answered",
        .0.answered_count,
        .0.total_count
    )]
    IncompleteInput(ValidationReport),
    #[error(transparent)]
    Rejected(#[from] ResponseRejection),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AssessmentServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::AlreadyCompleted => Self::AlreadyCompleted,
            other => Self::Repository(other),
        }
    }
}
