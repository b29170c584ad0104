//! Career assessment catalog, response tracking, and scoring.

pub mod catalog;
pub mod definition;
pub mod domain;
pub mod import;
pub mod insights;
pub mod memory;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{AssessmentCatalog, CAREER_DISCOVERY, CAREER_DISCOVERY_PILOT};
pub use definition::{
    AssessmentDefinition, AssessmentSummary, AssessmentVariant, DefinitionError,
    DomainDefinition, QuestionDefinition, RatingScale, SectionDefinition, SectionKind,
    SubDomainDefinition,
};
pub use domain::{
    AssessmentId, AttemptId, AttemptStatus, ProgressView, QuestionId, Rating, ResponseSet,
    StudentId,
};
pub use import::{ImportError, ResponseImporter};
pub use insights::{RankedArea, ResultInsights};
pub use memory::InMemoryAttemptRepository;
pub use repository::{
    AssessmentCompleted, AttemptKey, AttemptRecord, AttemptRepository, AttemptStatusView,
    Completion, CompletionNotifier, NotifyError, RepositoryError,
};
pub use router::assessment_router;
pub use scoring::{
    Band, BandLevel, BandScheme, BandingConfig, DomainScore, ScoreCard, ScoringEngine,
    ScoringError, SectionOutcome, SectionScores, SpectrumPlacement, SpectrumPosition,
    SubDomainScore,
};
pub use service::{AssessmentResults, AssessmentService, AssessmentServiceError};
pub use validation::{validate, RatingViolation, ResponseRejection, ValidationReport};
