use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AssessmentId, AttemptId, AttemptStatus, ProgressView, ResponseSet, StudentId,
};
use super::scoring::ScoreCard;

/// An attempt is unique per student and assessment variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptKey {
    pub student_id: StudentId,
    pub assessment_id: AssessmentId,
}

impl AttemptKey {
    pub fn new(student_id: StudentId, assessment_id: AssessmentId) -> Self {
        Self {
            student_id,
            assessment_id,
        }
    }
}

/// Repository record containing responses, status, and the scores persisted at completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt_id: AttemptId,
    pub key: AttemptKey,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_time_seconds: Option<u32>,
    pub responses: ResponseSet,
    /// Incremented by every merge that changes a rating; finalization only succeeds against the
    /// revision it scored.
    pub revision: u64,
    pub scores: Option<ScoreCard>,
}

impl AttemptRecord {
    pub fn new(attempt_id: AttemptId, key: AttemptKey, now: DateTime<Utc>) -> Self {
        Self {
            attempt_id,
            key,
            status: AttemptStatus::InProgress,
            started_at: now,
            updated_at: now,
            completed_at: None,
            total_time_seconds: None,
            responses: ResponseSet::new(),
            revision: 0,
            scores: None,
        }
    }

    pub fn status_view(&self, progress: ProgressView) -> AttemptStatusView {
        AttemptStatusView {
            attempt_id: self.attempt_id.clone(),
            student_id: self.key.student_id.clone(),
            assessment_id: self.key.assessment_id.clone(),
            status: self.status.label(),
            progress,
            started_at: self.started_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
            total_time_seconds: self.total_time_seconds,
            holland_code: self
                .scores
                .as_ref()
                .and_then(|scores| scores.holland_code.clone()),
        }
    }
}

/// Terminal data written by a successful finalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub scores: ScoreCard,
    pub completed_at: DateTime<Utc>,
    pub total_time_seconds: u32,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// `merge_responses` and `complete` must each be atomic: concurrent merges never drop keys, and
/// `complete` is a check-and-set on the in-progress status and the expected revision.
pub trait AttemptRepository: Send + Sync {
    fn insert(&self, record: AttemptRecord) -> Result<AttemptRecord, RepositoryError>;
    fn fetch(&self, key: &AttemptKey) -> Result<Option<AttemptRecord>, RepositoryError>;
    fn merge_responses(
        &self,
        key: &AttemptKey,
        partial: &ResponseSet,
        at: DateTime<Utc>,
    ) -> Result<AttemptRecord, RepositoryError>;
    fn complete(
        &self,
        key: &AttemptKey,
        expected_revision: u64,
        completion: Completion,
    ) -> Result<AttemptRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("attempt already exists")]
    Conflict,
    #[error("attempt not found")]
    NotFound,
    #[error("attempt already completed")]
    AlreadyCompleted,
    #[error("responses changed while scoring (expected revision {expected}, found {found})")]
    StaleRevision { expected: u64, found: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for report generation and other downstream consumers.
pub trait CompletionNotifier: Send + Sync {
    fn notify(&self, event: AssessmentCompleted) -> Result<(), NotifyError>;
}

/// Event published once per finalized attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentCompleted {
    pub attempt_id: AttemptId,
    pub student_id: StudentId,
    pub assessment_id: AssessmentId,
    pub holland_code: Option<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of an attempt's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptStatusView {
    pub attempt_id: AttemptId,
    pub student_id: StudentId,
    pub assessment_id: AssessmentId,
    pub status: &'static str,
    pub progress: ProgressView,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holland_code: Option<String>,
}
