use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::definition::AssessmentDefinition;
use super::domain::{ProgressView, QuestionId, Rating, ResponseSet};

/// A stored rating that falls outside the definition's scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingViolation {
    pub question: QuestionId,
    pub rating: Rating,
    pub min: Rating,
    pub max: Rating,
}

/// Completeness check of a response set against a question catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_complete: bool,
    pub answered_count: usize,
    pub total_count: usize,
    /// Unanswered catalog questions, in catalog order.
    pub missing_questions: Vec<QuestionId>,
    pub invalid_ratings: Vec<RatingViolation>,
    /// Response keys that are not part of the catalog. Never counted as answered.
    pub unexpected_questions: Vec<QuestionId>,
}

impl ValidationReport {
    /// Complete and every rating within the scale; the precondition for scoring.
    pub fn is_valid(&self) -> bool {
        self.is_complete && self.invalid_ratings.is_empty()
    }

    pub fn progress(&self) -> ProgressView {
        ProgressView::new(self.answered_count, self.total_count)
    }
}

pub fn validate(responses: &ResponseSet, definition: &AssessmentDefinition) -> ValidationReport {
    let scale = definition.rating;
    let mut missing_questions = Vec::new();
    let mut invalid_ratings = Vec::new();
    let mut answered_count = 0;

    for question in &definition.questions {
        match responses.get(&question.id) {
            Some(rating) => {
                answered_count += 1;
                if !scale.contains(rating) {
                    invalid_ratings.push(RatingViolation {
                        question: question.id.clone(),
                        rating,
                        min: scale.min,
                        max: scale.max,
                    });
                }
            }
            None => missing_questions.push(question.id.clone()),
        }
    }

    let catalog: HashSet<&QuestionId> = definition.question_ids().collect();
    let unexpected_questions = responses
        .iter()
        .filter(|(question, _)| !catalog.contains(question))
        .map(|(question, _)| question.clone())
        .collect();

    ValidationReport {
        is_complete: missing_questions.is_empty(),
        answered_count,
        total_count: definition.questions.len(),
        missing_questions,
        invalid_ratings,
        unexpected_questions,
    }
}

/// Reasons a partial save is refused before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseRejection {
    #[error("question {0} is not part of this assessment")]
    UnknownQuestion(QuestionId),
    #[error("rating {} for question {} is outside {}..={}", .0.rating, .0.question, .0.min, .0.max)]
    OutOfRangeRating(RatingViolation),
}

/// Check every entry of a partial save belongs to the catalog and respects the scale.
pub fn check_partial(
    partial: &ResponseSet,
    definition: &AssessmentDefinition,
) -> Result<(), ResponseRejection> {
    let scale = definition.rating;
    for (question, rating) in partial.iter() {
        if definition.question(question).is_none() {
            return Err(ResponseRejection::UnknownQuestion(question.clone()));
        }
        if !scale.contains(rating) {
            return Err(ResponseRejection::OutOfRangeRating(RatingViolation {
                question: question.clone(),
                rating,
                min: scale.min,
                max: scale.max,
            }));
        }
    }
    Ok(())
}
