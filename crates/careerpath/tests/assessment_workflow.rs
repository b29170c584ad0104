//! Integration scenarios for the assessment lifecycle.
//!
//! Scenarios drive the public service facade and HTTP router with the standard catalog so
//! progress tracking, completion, and scoring are exercised without reaching into private
//! modules.

mod common {
    use std::sync::{Arc, Mutex};

    use careerpath::assessment::{
        AssessmentCatalog, AssessmentCompleted, AssessmentDefinition, AssessmentId,
        AssessmentService, CompletionNotifier, InMemoryAttemptRepository, NotifyError, Rating,
        ResponseSet, StudentId, CAREER_DISCOVERY_PILOT,
    };
    use careerpath::config::ScoringConfig;

    #[derive(Default, Clone)]
    pub(super) struct RecordingNotifier {
        events: Arc<Mutex<Vec<AssessmentCompleted>>>,
    }

    impl RecordingNotifier {
        pub(super) fn events(&self) -> Vec<AssessmentCompleted> {
            self.events.lock().expect("notifier mutex").clone()
        }
    }

    impl CompletionNotifier for RecordingNotifier {
        fn notify(&self, event: AssessmentCompleted) -> Result<(), NotifyError> {
            self.events.lock().expect("notifier mutex").push(event);
            Ok(())
        }
    }

    pub(super) type Service = AssessmentService<InMemoryAttemptRepository, RecordingNotifier>;

    pub(super) fn service() -> (Service, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = AssessmentService::new(
            Arc::new(AssessmentCatalog::standard()),
            Arc::new(InMemoryAttemptRepository::default()),
            notifier.clone(),
            &ScoringConfig::default(),
        );
        (service, notifier)
    }

    pub(super) fn student(id: &str) -> StudentId {
        StudentId(id.to_string())
    }

    pub(super) fn pilot() -> AssessmentId {
        AssessmentId(CAREER_DISCOVERY_PILOT.to_string())
    }

    /// Rate holland items by their interest type and everything else at `rating`.
    pub(super) fn responses(definition: &AssessmentDefinition, rating: Rating) -> ResponseSet {
        definition
            .questions
            .iter()
            .map(|question| {
                let value = match question.domain.as_str() {
                    "S" => 5,
                    "A" => 4,
                    "E" => 3,
                    "R" | "I" | "C" => 1,
                    _ => rating,
                };
                (question.id.clone(), value)
            })
            .collect()
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use careerpath::assessment::{
    assessment_router, AssessmentServiceError, ResponseImporter, ResponseSet,
};
use common::*;
use tower::ServiceExt;

#[test]
fn student_completes_the_pilot_in_several_sittings() {
    let (service, notifier) = service();
    let definition = service.definition(&pilot()).expect("pilot exists").clone();
    let all = responses(&definition, 4);

    service
        .start(student("stu-7"), pilot())
        .expect("attempt starts");

    let entries: Vec<_> = all.iter().map(|(id, rating)| (id.clone(), rating)).collect();
    let (first_half, second_half) = entries.split_at(entries.len() / 2);
    let first: ResponseSet = first_half.iter().cloned().collect();
    let second: ResponseSet = second_half.iter().cloned().collect();

    let progress = service
        .save_progress(student("stu-7"), pilot(), &first)
        .expect("first sitting");
    assert!(progress.percentage < 100);
    assert!(matches!(
        service.complete(student("stu-7"), pilot(), None),
        Err(AssessmentServiceError::IncompleteInput(_))
    ));

    let progress = service
        .save_progress(student("stu-7"), pilot(), &second)
        .expect("second sitting");
    assert_eq!(progress.percentage, 100);

    let scores = service
        .complete(student("stu-7"), pilot(), Some(900))
        .expect("completes");
    assert_eq!(scores.holland_code.as_deref(), Some("SAE"));
    assert_eq!(notifier.events().len(), 1);

    let results = service.results(student("stu-7"), pilot()).expect("results");
    assert_eq!(results.scores, scores);
    assert!(!results.insights.strengths.is_empty());
}

#[test]
fn students_have_independent_attempts() {
    let (service, _) = service();
    let definition = service.definition(&pilot()).expect("pilot exists").clone();

    let (first, _) = service.start(student("stu-1"), pilot()).expect("starts");
    let (second, _) = service.start(student("stu-2"), pilot()).expect("starts");
    service
        .save_progress(student("stu-1"), pilot(), &responses(&definition, 2))
        .expect("save");

    assert_ne!(first.attempt_id, second.attempt_id);
    let other = service.validation(student("stu-2"), pilot()).expect("report");
    assert_eq!(other.answered_count, 0);
    assert_eq!(other.total_count, definition.questions.len());
}

#[test]
fn imported_csv_responses_can_be_saved() {
    let (service, _) = service();
    service.start(student("stu-3"), pilot()).expect("starts");
    let definition = service.definition(&pilot()).expect("pilot exists");
    let first = &definition.questions[0].id;
    let csv = format!("question_id,rating\n{first},2\n{first},4\n");

    let imported = ResponseImporter::from_reader(csv.as_bytes()).expect("csv imports");
    let progress = service
        .save_progress(student("stu-3"), pilot(), &imported)
        .expect("save");

    assert_eq!(progress.answered, 1);
    let record = service.get(student("stu-3"), pilot()).expect("record");
    assert_eq!(record.responses.get(first), Some(4));
}

#[tokio::test]
async fn router_serves_the_standard_catalog() {
    let (service, _) = service();
    let router = assessment_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/assessments/career-discovery-pilot")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/api/v1/students/stu-9/assessments/career-discovery-pilot/attempt/responses")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{ "responses": {} }"#))
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
