mod bands;
mod composite;
mod rules;
mod spectrum;

pub use bands::{Band, BandLevel, BandScheme, BandingConfig};
pub use spectrum::{SpectrumPlacement, SpectrumPosition};

use serde::{Deserialize, Serialize};

use super::definition::{AssessmentDefinition, AssessmentVariant, DefinitionError, SectionKind};
use super::domain::{AssessmentId, QuestionId, Rating, ResponseSet};
use super::validation::validate;
use crate::config::ScoringConfig;

/// Aggregate for one domain of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub band: Band,
    pub item_count: usize,
}

/// Aggregate for a sub-domain nested under `domain_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubDomainScore {
    pub id: String,
    pub name: String,
    pub domain_id: String,
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub item_count: usize,
}

/// Interpretation attached to a section, one variant per section kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionOutcome {
    LikertSum {
        domains: Vec<DomainScore>,
    },
    Composite {
        domains: Vec<DomainScore>,
        holland_code: String,
        top_three: Vec<String>,
    },
    Spectrum {
        domains: Vec<DomainScore>,
        placements: Vec<SpectrumPlacement>,
    },
}

impl SectionOutcome {
    pub fn domains(&self) -> &[DomainScore] {
        match self {
            SectionOutcome::LikertSum { domains }
            | SectionOutcome::Composite { domains, .. }
            | SectionOutcome::Spectrum { domains, .. } => domains,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub section_id: String,
    pub title: String,
    #[serde(flatten)]
    pub outcome: SectionOutcome,
}

/// Everything derived from a complete response set. Persisted once at completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub assessment_id: AssessmentId,
    pub variant: AssessmentVariant,
    pub sections: Vec<SectionScores>,
    pub sub_domain_scores: Vec<SubDomainScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holland_code: Option<String>,
}

impl ScoreCard {
    pub fn domain_scores(&self) -> impl Iterator<Item = &DomainScore> {
        self.sections
            .iter()
            .flat_map(|section| section.outcome.domains().iter())
    }

    pub fn section(&self, section_id: &str) -> Option<&SectionScores> {
        self.sections
            .iter()
            .find(|section| section.section_id == section_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("responses incomplete: {} of {total} questions unanswered", .missing.len())]
    IncompleteInput {
        missing: Vec<QuestionId>,
        total: usize,
    },
    #[error("rating {rating} for question {question} is outside {min}..={max}")]
    OutOfRangeRating {
        question: QuestionId,
        rating: Rating,
        min: Rating,
        max: Rating,
    },
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Pure scoring over a definition and a complete response set.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    banding: BandingConfig,
    balance_band: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(BandingConfig::standard(), &ScoringConfig::default())
    }
}

impl ScoringEngine {
    pub fn new(banding: BandingConfig, config: &ScoringConfig) -> Self {
        Self {
            banding,
            balance_band: config.balance_band,
        }
    }

    pub fn banding(&self) -> &BandingConfig {
        &self.banding
    }

    pub fn score(
        &self,
        definition: &AssessmentDefinition,
        responses: &ResponseSet,
    ) -> Result<ScoreCard, ScoringError> {
        definition.validate()?;

        let report = validate(responses, definition);
        if !report.is_complete {
            return Err(ScoringError::IncompleteInput {
                missing: report.missing_questions,
                total: report.total_count,
            });
        }
        if let Some(violation) = report.invalid_ratings.into_iter().next() {
            return Err(ScoringError::OutOfRangeRating {
                question: violation.question,
                rating: violation.rating,
                min: violation.min,
                max: violation.max,
            });
        }

        let grouped = definition.questions_by_domain();
        let mut sections = Vec::with_capacity(definition.sections.len());
        let mut holland_code = None;

        for section in &definition.sections {
            let scheme = self.banding.scheme_for(&section.id);
            let mut domains = Vec::with_capacity(section.domains.len());
            let mut placements = Vec::new();

            for domain in &section.domains {
                let questions = grouped
                    .get(domain.id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let tally = rules::tally(questions, responses, definition.rating)?;
                if section.kind == SectionKind::Spectrum {
                    placements.push(spectrum::place(
                        domain,
                        &tally,
                        definition.rating,
                        self.balance_band,
                    ));
                }
                domains.push(rules::domain_score(domain, &tally, scheme));
            }

            let outcome = match section.kind {
                SectionKind::LikertSum => SectionOutcome::LikertSum { domains },
                SectionKind::Composite => {
                    let (code, top_three) = composite::holland_code(&domains);
                    holland_code.get_or_insert_with(|| code.clone());
                    SectionOutcome::Composite {
                        domains,
                        holland_code: code,
                        top_three,
                    }
                }
                SectionKind::Spectrum => SectionOutcome::Spectrum {
                    domains,
                    placements,
                },
            };

            sections.push(SectionScores {
                section_id: section.id.clone(),
                title: section.title.clone(),
                outcome,
            });
        }

        let sub_domain_scores = rules::sub_domain_scores(definition, &grouped, responses)?;

        Ok(ScoreCard {
            assessment_id: definition.id.clone(),
            variant: definition.variant,
            sections,
            sub_domain_scores,
            holland_code,
        })
    }
}
