use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::assessment::definition::{
    AssessmentDefinition, AssessmentVariant, DomainDefinition, QuestionDefinition, RatingScale,
    SectionDefinition, SectionKind, SubDomainDefinition,
};
use crate::assessment::domain::{AssessmentId, QuestionId, Rating, ResponseSet, StudentId};
use crate::assessment::repository::{
    AssessmentCompleted, AttemptKey, AttemptRecord, AttemptRepository, Completion,
    CompletionNotifier, NotifyError, RepositoryError,
};
use crate::assessment::{
    assessment_router, AssessmentCatalog, AssessmentService, InMemoryAttemptRepository,
};
use crate::config::ScoringConfig;

pub(super) const STUDENT: &str = "stu-0042";
pub(super) const TWO_DOMAIN: &str = "two-domain";
pub(super) const RIASEC: &str = "riasec";

pub(super) fn student() -> StudentId {
    StudentId(STUDENT.to_string())
}

pub(super) fn assessment(id: &str) -> AssessmentId {
    AssessmentId(id.to_string())
}

pub(super) fn domain(id: &str, name: &str) -> DomainDefinition {
    DomainDefinition {
        id: id.to_string(),
        name: name.to_string(),
        icon: String::new(),
        color: String::new(),
        opposite: None,
        sub_domains: Vec::new(),
    }
}

pub(super) fn question(id: &str, domain: &str) -> QuestionDefinition {
    QuestionDefinition {
        id: QuestionId::new(id),
        domain: domain.to_string(),
        sub_domain: None,
        reverse: false,
        prompt: format!("Prompt for {id}"),
    }
}

pub(super) fn definition(
    id: &str,
    sections: Vec<SectionDefinition>,
    questions: Vec<QuestionDefinition>,
) -> AssessmentDefinition {
    AssessmentDefinition {
        id: assessment(id),
        title: id.to_string(),
        variant: AssessmentVariant::Full,
        rating: RatingScale::LIKERT_FIVE,
        sections,
        questions,
    }
}

/// Skills section with domain A (`a1`, `a2`, split into two facets) and domain B (`b1`, `b2`).
pub(super) fn two_domain_definition() -> AssessmentDefinition {
    let mut alpha = domain("alpha", "Alpha");
    alpha.sub_domains = vec![
        SubDomainDefinition {
            id: "alpha_focus".to_string(),
            name: "Focus".to_string(),
        },
        SubDomainDefinition {
            id: "alpha_drive".to_string(),
            name: "Drive".to_string(),
        },
    ];

    let mut a1 = question("a1", "alpha");
    a1.sub_domain = Some("alpha_focus".to_string());
    let mut a2 = question("a2", "alpha");
    a2.sub_domain = Some("alpha_drive".to_string());

    definition(
        TWO_DOMAIN,
        vec![SectionDefinition {
            id: "skills".to_string(),
            title: "Skills".to_string(),
            kind: SectionKind::LikertSum,
            domains: vec![alpha, domain("beta", "Beta")],
        }],
        vec![a1, a2, question("b1", "beta"), question("b2", "beta")],
    )
}

/// Holland section with two items per interest type, `r1`/`r2` through `c1`/`c2`.
pub(super) fn holland_definition() -> AssessmentDefinition {
    let codes = ["R", "I", "A", "S", "E", "C"];
    let domains = codes.iter().map(|code| domain(code, code)).collect();
    let questions = codes
        .iter()
        .flat_map(|code| {
            let lower = code.to_lowercase();
            [
                question(&format!("{lower}1"), code),
                question(&format!("{lower}2"), code),
            ]
        })
        .collect();

    definition(
        RIASEC,
        vec![SectionDefinition {
            id: "holland".to_string(),
            title: "Career Interests".to_string(),
            kind: SectionKind::Composite,
            domains,
        }],
        questions,
    )
}

/// Ratings giving I=10, R=9, S=8, E=6, A=4, C=2.
pub(super) fn irs_responses() -> ResponseSet {
    ResponseSet::from([
        ("r1", 5),
        ("r2", 4),
        ("i1", 5),
        ("i2", 5),
        ("a1", 2),
        ("a2", 2),
        ("s1", 4),
        ("s2", 4),
        ("e1", 3),
        ("e2", 3),
        ("c1", 1),
        ("c2", 1),
    ])
}

pub(super) fn uniform_responses(definition: &AssessmentDefinition, rating: Rating) -> ResponseSet {
    definition
        .question_ids()
        .map(|id| (id.clone(), rating))
        .collect()
}

pub(super) fn test_catalog() -> Arc<AssessmentCatalog> {
    let catalog =
        AssessmentCatalog::from_definitions(vec![two_domain_definition(), holland_definition()])
            .expect("test definitions are valid");
    Arc::new(catalog)
}

pub(super) fn build_service() -> (
    AssessmentService<InMemoryAttemptRepository, MemoryNotifier>,
    Arc<InMemoryAttemptRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(InMemoryAttemptRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = AssessmentService::new(
        test_catalog(),
        repository.clone(),
        notifier.clone(),
        &ScoringConfig::default(),
    );
    (service, repository, notifier)
}

pub(super) fn service_with<R: AttemptRepository + 'static, N: CompletionNotifier + 'static>(
    repository: R,
    notifier: N,
) -> AssessmentService<R, N> {
    AssessmentService::new(
        test_catalog(),
        Arc::new(repository),
        Arc::new(notifier),
        &ScoringConfig::default(),
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<AssessmentCompleted>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<AssessmentCompleted> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl CompletionNotifier for MemoryNotifier {
    fn notify(&self, event: AssessmentCompleted) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl CompletionNotifier for FailingNotifier {
    fn notify(&self, _event: AssessmentCompleted) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("report queue offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl AttemptRepository for UnavailableRepository {
    fn insert(&self, _record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _key: &AttemptKey) -> Result<Option<AttemptRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn merge_responses(
        &self,
        _key: &AttemptKey,
        _partial: &ResponseSet,
        _at: DateTime<Utc>,
    ) -> Result<AttemptRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn complete(
        &self,
        _key: &AttemptKey,
        _expected_revision: u64,
        _completion: Completion,
    ) -> Result<AttemptRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Lands one extra save between the service's read and its finalize write.
pub(super) struct RacingRepository {
    pub(super) inner: InMemoryAttemptRepository,
    late_save: ResponseSet,
    raced: AtomicBool,
}

impl RacingRepository {
    pub(super) fn with_late_save(late_save: ResponseSet) -> Self {
        Self {
            inner: InMemoryAttemptRepository::default(),
            late_save,
            raced: AtomicBool::new(false),
        }
    }
}

impl Default for RacingRepository {
    fn default() -> Self {
        Self::with_late_save(ResponseSet::from([("a1", 1)]))
    }
}

impl AttemptRepository for RacingRepository {
    fn insert(&self, record: AttemptRecord) -> Result<AttemptRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn fetch(&self, key: &AttemptKey) -> Result<Option<AttemptRecord>, RepositoryError> {
        self.inner.fetch(key)
    }

    fn merge_responses(
        &self,
        key: &AttemptKey,
        partial: &ResponseSet,
        at: DateTime<Utc>,
    ) -> Result<AttemptRecord, RepositoryError> {
        self.inner.merge_responses(key, partial, at)
    }

    fn complete(
        &self,
        key: &AttemptKey,
        expected_revision: u64,
        completion: Completion,
    ) -> Result<AttemptRecord, RepositoryError> {
        if !self.raced.swap(true, Ordering::SeqCst) {
            self.inner.merge_responses(key, &self.late_save, Utc::now())?;
        }
        self.inner.complete(key, expected_revision, completion)
    }
}

pub(super) fn attempt_path(assessment_id: &str, suffix: &str) -> String {
    format!("/api/v1/students/{STUDENT}/assessments/{assessment_id}/attempt{suffix}")
}

pub(super) fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: AssessmentService<InMemoryAttemptRepository, MemoryNotifier>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}
