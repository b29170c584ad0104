use serde::Serialize;

use super::scoring::ScoreCard;

/// A ranked sub-domain (or domain, when a definition has no sub-domains).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArea {
    pub id: String,
    pub name: String,
    pub domain_id: String,
    pub score: u32,
    pub percentage: f64,
}

/// Strengths and growth areas drawn from a score card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultInsights {
    /// Highest scores first.
    pub strengths: Vec<RankedArea>,
    /// Lowest scores first.
    pub growth_areas: Vec<RankedArea>,
}

impl ResultInsights {
    pub fn from_card(card: &ScoreCard, limit: usize) -> Self {
        let mut ranked: Vec<RankedArea> = if card.sub_domain_scores.is_empty() {
            card.domain_scores()
                .map(|domain| RankedArea {
                    id: domain.id.clone(),
                    name: domain.name.clone(),
                    domain_id: domain.id.clone(),
                    score: domain.score,
                    percentage: domain.percentage,
                })
                .collect()
        } else {
            card.sub_domain_scores
                .iter()
                .map(|sub| RankedArea {
                    id: sub.id.clone(),
                    name: sub.name.clone(),
                    domain_id: sub.domain_id.clone(),
                    score: sub.score,
                    percentage: sub.percentage,
                })
                .collect()
        };

        ranked.sort_by(|left, right| right.score.cmp(&left.score));

        let strengths = ranked.iter().take(limit).cloned().collect();
        let growth_areas = ranked.iter().rev().take(limit).cloned().collect();

        Self {
            strengths,
            growth_areas,
        }
    }
}
