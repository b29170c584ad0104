use std::collections::BTreeMap;

use super::super::definition::{
    AssessmentDefinition, DomainDefinition, QuestionDefinition, RatingScale,
};
use super::super::domain::ResponseSet;
use super::bands::BandScheme;
use super::{DomainScore, ScoringError, SubDomainScore};

/// Keyed sum over a group of items, together with its theoretical bounds.
pub(crate) struct Tally {
    pub score: u32,
    pub item_count: usize,
    pub min_score: u32,
    pub max_score: u32,
}

impl Tally {
    pub fn percentage(&self) -> f64 {
        percentage(self.score, self.max_score)
    }
}

pub(crate) fn tally(
    questions: &[&QuestionDefinition],
    responses: &ResponseSet,
    scale: RatingScale,
) -> Result<Tally, ScoringError> {
    let mut score = 0u32;
    for question in questions {
        let rating = responses
            .get(&question.id)
            .ok_or_else(|| ScoringError::IncompleteInput {
                missing: vec![question.id.clone()],
                total: questions.len(),
            })?;
        score += scale.keyed(rating, question.reverse);
    }

    let item_count = questions.len();
    let count = item_count as u32;
    Ok(Tally {
        score,
        item_count,
        min_score: count * u32::from(scale.min),
        max_score: count * u32::from(scale.max),
    })
}

/// Share of the maximum, rounded to one decimal.
pub(crate) fn percentage(score: u32, max_score: u32) -> f64 {
    if max_score == 0 {
        return 0.0;
    }
    let raw = f64::from(score) / f64::from(max_score) * 100.0;
    (raw * 10.0).round() / 10.0
}

pub(crate) fn domain_score(
    domain: &DomainDefinition,
    tally: &Tally,
    scheme: &BandScheme,
) -> DomainScore {
    let percentage = tally.percentage();
    DomainScore {
        id: domain.id.clone(),
        name: domain.name.clone(),
        icon: domain.icon.clone(),
        color: domain.color.clone(),
        score: tally.score,
        max_score: tally.max_score,
        percentage,
        band: scheme.classify(percentage),
        item_count: tally.item_count,
    }
}

/// Sub-domain aggregates in definition order, grouped under their parent domain.
pub(crate) fn sub_domain_scores(
    definition: &AssessmentDefinition,
    grouped: &BTreeMap<&str, Vec<&QuestionDefinition>>,
    responses: &ResponseSet,
) -> Result<Vec<SubDomainScore>, ScoringError> {
    let mut scores = Vec::new();
    for domain in definition.domains() {
        let Some(questions) = grouped.get(domain.id.as_str()) else {
            continue;
        };
        for sub_domain in &domain.sub_domains {
            let items: Vec<&QuestionDefinition> = questions
                .iter()
                .copied()
                .filter(|question| question.sub_domain.as_ref() == Some(&sub_domain.id))
                .collect();
            if items.is_empty() {
                continue;
            }
            let tally = tally(&items, responses, definition.rating)?;
            scores.push(SubDomainScore {
                id: sub_domain.id.clone(),
                name: sub_domain.name.clone(),
                domain_id: domain.id.clone(),
                score: tally.score,
                max_score: tally.max_score,
                percentage: tally.percentage(),
                item_count: tally.item_count,
            });
        }
    }
    Ok(scores)
}
