use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::domain::{AssessmentId, QuestionId, Rating};

/// Full catalog or the shorter invite-gated pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentVariant {
    Full,
    Pilot,
}

impl AssessmentVariant {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentVariant::Full => "full",
            AssessmentVariant::Pilot => "pilot",
        }
    }
}

/// Inclusive bounds of the Likert scale used by every question of a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: Rating,
    pub max: Rating,
}

impl RatingScale {
    pub const LIKERT_FIVE: RatingScale = RatingScale { min: 1, max: 5 };

    pub fn contains(&self, rating: Rating) -> bool {
        (self.min..=self.max).contains(&rating)
    }

    /// Value contributed by a rating, mirrored across the scale for reverse-keyed items.
    pub fn keyed(&self, rating: Rating, reverse: bool) -> u32 {
        if reverse {
            u32::from(self.min) + u32::from(self.max) - u32::from(rating)
        } else {
            u32::from(rating)
        }
    }
}

/// How a section's domain totals are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Plain per-domain sums with bands.
    LikertSum,
    /// Domain sums plus a three-letter code built from the top domains.
    Composite,
    /// Bipolar dimensions placed on a spectrum between a domain and its opposite.
    Spectrum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDomainDefinition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    /// Opposite pole, only meaningful for spectrum sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opposite: Option<String>,
    #[serde(default)]
    pub sub_domains: Vec<SubDomainDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDefinition {
    /// Assessment type id (`holland`, `personality`, ...). Keys the band scheme.
    pub id: String,
    pub title: String,
    pub kind: SectionKind,
    pub domains: Vec<DomainDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: QuestionId,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_domain: Option<String>,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub prompt: String,
}

/// Assessment definition: the question catalog and the scoring structure over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentDefinition {
    pub id: AssessmentId,
    pub title: String,
    pub variant: AssessmentVariant,
    pub rating: RatingScale,
    pub sections: Vec<SectionDefinition>,
    pub questions: Vec<QuestionDefinition>,
}

/// Summary returned by catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentSummary {
    pub id: AssessmentId,
    pub title: String,
    pub variant: AssessmentVariant,
    pub sections: Vec<String>,
    pub question_count: usize,
}

/// Structural problems that make a definition unscorable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("rating scale must satisfy min < max (got {min}..={max})")]
    InvalidScale { min: Rating, max: Rating },
    #[error("question id {0} appears more than once")]
    DuplicateQuestion(QuestionId),
    #[error("domain id {0} appears more than once")]
    DuplicateDomain(String),
    #[error("question {question} references unknown domain {domain}")]
    UnknownDomain { question: QuestionId, domain: String },
    #[error("question {question} references sub-domain {sub_domain} outside domain {domain}")]
    UnknownSubDomain {
        question: QuestionId,
        domain: String,
        sub_domain: String,
    },
    #[error("domain {0} has no questions")]
    EmptyDomain(String),
    #[error("sub-domain {0} has no questions")]
    EmptySubDomain(String),
    #[error("composite section {section} needs at least three domains, found {found}")]
    CompositeTooSmall { section: String, found: usize },
    #[error("spectrum domain {0} must declare an opposite pole")]
    MissingOpposite(String),
    #[error("domain {0} declares an opposite pole outside a spectrum section")]
    UnexpectedOpposite(String),
}

impl AssessmentDefinition {
    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            variant: self.variant,
            sections: self.sections.iter().map(|section| section.id.clone()).collect(),
            question_count: self.questions.len(),
        }
    }

    pub fn question(&self, id: &QuestionId) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.questions.iter().map(|question| &question.id)
    }

    pub fn domains(&self) -> impl Iterator<Item = &DomainDefinition> {
        self.sections.iter().flat_map(|section| section.domains.iter())
    }

    /// Questions grouped by domain id, in catalog order.
    pub(crate) fn questions_by_domain(&self) -> BTreeMap<&str, Vec<&QuestionDefinition>> {
        let mut grouped: BTreeMap<&str, Vec<&QuestionDefinition>> = BTreeMap::new();
        for question in &self.questions {
            grouped
                .entry(question.domain.as_str())
                .or_default()
                .push(question);
        }
        grouped
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.rating.min >= self.rating.max {
            return Err(DefinitionError::InvalidScale {
                min: self.rating.min,
                max: self.rating.max,
            });
        }

        let mut domain_ids = HashSet::new();
        for section in &self.sections {
            if section.kind == SectionKind::Composite && section.domains.len() < 3 {
                return Err(DefinitionError::CompositeTooSmall {
                    section: section.id.clone(),
                    found: section.domains.len(),
                });
            }

            for domain in &section.domains {
                if !domain_ids.insert(domain.id.as_str()) {
                    return Err(DefinitionError::DuplicateDomain(domain.id.clone()));
                }
                match (section.kind, &domain.opposite) {
                    (SectionKind::Spectrum, None) => {
                        return Err(DefinitionError::MissingOpposite(domain.id.clone()))
                    }
                    (SectionKind::LikertSum | SectionKind::Composite, Some(_)) => {
                        return Err(DefinitionError::UnexpectedOpposite(domain.id.clone()))
                    }
                    _ => {}
                }
            }
        }

        let mut question_ids = HashSet::new();
        for question in &self.questions {
            if !question_ids.insert(&question.id) {
                return Err(DefinitionError::DuplicateQuestion(question.id.clone()));
            }

            let domain = self
                .domains()
                .find(|domain| domain.id == question.domain)
                .ok_or_else(|| DefinitionError::UnknownDomain {
                    question: question.id.clone(),
                    domain: question.domain.clone(),
                })?;

            if let Some(sub_domain) = &question.sub_domain {
                if !domain.sub_domains.iter().any(|sub| &sub.id == sub_domain) {
                    return Err(DefinitionError::UnknownSubDomain {
                        question: question.id.clone(),
                        domain: domain.id.clone(),
                        sub_domain: sub_domain.clone(),
                    });
                }
            }
        }

        let grouped = self.questions_by_domain();
        if let Some(empty) = self
            .domains()
            .find(|domain| !grouped.contains_key(domain.id.as_str()))
        {
            return Err(DefinitionError::EmptyDomain(empty.id.clone()));
        }

        for domain in self.domains() {
            for sub_domain in &domain.sub_domains {
                let used = grouped
                    .get(domain.id.as_str())
                    .map(|questions| {
                        questions
                            .iter()
                            .any(|question| question.sub_domain.as_ref() == Some(&sub_domain.id))
                    })
                    .unwrap_or(false);
                if !used {
                    return Err(DefinitionError::EmptySubDomain(sub_domain.id.clone()));
                }
            }
        }

        Ok(())
    }
}
