use super::common::*;
use crate::assessment::domain::{ProgressView, QuestionId, ResponseSet};
use crate::assessment::validation::{check_partial, validate, ResponseRejection, RatingViolation};

#[test]
fn complete_responses_validate_cleanly() {
    let definition = two_domain_definition();

    let report = validate(&uniform_responses(&definition, 2), &definition);

    assert!(report.is_complete);
    assert!(report.is_valid());
    assert_eq!((report.answered_count, report.total_count), (4, 4));
    assert!(report.missing_questions.is_empty());
}

#[test]
fn missing_questions_are_reported_in_catalog_order() {
    let definition = two_domain_definition();
    let responses = ResponseSet::from([("b2", 3), ("a1", 3)]);

    let report = validate(&responses, &definition);

    assert!(!report.is_complete);
    assert_eq!(report.answered_count, 2);
    assert_eq!(
        report.missing_questions,
        vec![QuestionId::new("a2"), QuestionId::new("b1")]
    );
    assert_eq!(report.progress(), ProgressView::new(2, 4));
    assert_eq!(report.progress().percentage, 50);
}

#[test]
fn out_of_range_ratings_count_as_answered_but_invalid() {
    let definition = two_domain_definition();
    let mut responses = uniform_responses(&definition, 3);
    responses.insert(QuestionId::new("a2"), 0);

    let report = validate(&responses, &definition);

    assert!(report.is_complete);
    assert!(!report.is_valid());
    assert_eq!(
        report.invalid_ratings,
        vec![RatingViolation {
            question: QuestionId::new("a2"),
            rating: 0,
            min: 1,
            max: 5,
        }]
    );
}

#[test]
fn unknown_response_keys_do_not_count_toward_completion() {
    let definition = two_domain_definition();
    let responses = ResponseSet::from([("a1", 3), ("a2", 3), ("b1", 3), ("zz9", 4)]);

    let report = validate(&responses, &definition);

    assert!(!report.is_complete);
    assert_eq!(report.answered_count, 3);
    assert_eq!(report.unexpected_questions, vec![QuestionId::new("zz9")]);
}

#[test]
fn partial_saves_reject_unknown_questions() {
    let definition = two_domain_definition();
    let partial = ResponseSet::from([("a1", 3), ("q404", 3)]);

    assert_eq!(
        check_partial(&partial, &definition),
        Err(ResponseRejection::UnknownQuestion(QuestionId::new("q404")))
    );
}

#[test]
fn partial_saves_reject_ratings_outside_the_scale() {
    let definition = two_domain_definition();
    let partial = ResponseSet::from([("b1", 9)]);

    match check_partial(&partial, &definition) {
        Err(ResponseRejection::OutOfRangeRating(violation)) => {
            assert_eq!(violation.question, QuestionId::new("b1"));
            assert_eq!(violation.rating, 9);
        }
        other => panic!("expected out of range rejection, got {other:?}"),
    }
    assert_eq!(check_partial(&ResponseSet::new(), &definition), Ok(()));
}
