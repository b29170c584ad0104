use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a student taking assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

/// Identifier of an assessment definition. Each variant has its own id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

/// Identifier wrapper for stored attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(pub String);

/// Identifier of a catalog question; the key of every response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single Likert rating.
pub type Rating = u8;

/// Question-id to rating mapping collected while a student progresses through an assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<QuestionId, Rating>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question: QuestionId, rating: Rating) -> Option<Rating> {
        self.0.insert(question, rating)
    }

    pub fn get(&self, question: &QuestionId) -> Option<Rating> {
        self.0.get(question).copied()
    }

    pub fn contains(&self, question: &QuestionId) -> bool {
        self.0.contains_key(question)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, Rating)> {
        self.0.iter().map(|(question, rating)| (question, *rating))
    }

    /// Overlay `incoming` onto the stored responses. Incoming ratings replace existing ones for
    /// the same question; every other entry is kept. Returns whether any stored rating changed.
    pub fn merge(&mut self, incoming: &ResponseSet) -> bool {
        let mut changed = false;
        for (question, rating) in incoming.iter() {
            if self.0.insert(question.clone(), rating) != Some(rating) {
                changed = true;
            }
        }
        changed
    }
}

impl FromIterator<(QuestionId, Rating)> for ResponseSet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, Rating)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(&str, Rating); N]> for ResponseSet {
    fn from(entries: [(&str, Rating); N]) -> Self {
        entries
            .into_iter()
            .map(|(question, rating)| (QuestionId::new(question), rating))
            .collect()
    }
}

/// Lifecycle of an attempt. Completion is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttemptStatus {
    InProgress,
    Completed,
}

impl AttemptStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AttemptStatus::InProgress => "IN_PROGRESS",
            AttemptStatus::Completed => "COMPLETED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, AttemptStatus::Completed)
    }
}

/// Progress snapshot returned after each partial save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub answered: usize,
    pub total: usize,
    pub percentage: u8,
}

impl ProgressView {
    pub fn new(answered: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((answered as f64 / total as f64) * 100.0).round().clamp(0.0, 100.0) as u8
        };

        Self {
            answered,
            total,
            percentage,
        }
    }
}

/// Elapsed seconds between two instants, never negative.
pub(crate) fn elapsed_seconds(started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> u32 {
    (finished_at - started_at)
        .num_seconds()
        .clamp(0, i64::from(u32::MAX)) as u32
}
