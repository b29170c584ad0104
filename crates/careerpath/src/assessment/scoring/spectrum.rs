use serde::{Deserialize, Serialize};

use super::super::definition::{DomainDefinition, RatingScale};
use super::rules::Tally;

const MIDPOINT: f64 = 50.0;

/// Which side of a bipolar dimension a score leans toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumPosition {
    First,
    Opposite,
    Balanced,
}

/// Position of a domain between itself and its opposite pole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPlacement {
    pub domain_id: String,
    pub opposite: String,
    pub position: SpectrumPosition,
    /// 0 is the opposite pole, 100 the domain's own pole.
    pub percentage: f64,
}

pub(crate) fn place(
    domain: &DomainDefinition,
    tally: &Tally,
    scale: RatingScale,
    balance_band: f64,
) -> SpectrumPlacement {
    let span = tally.item_count as u32 * u32::from(scale.max - scale.min);
    let percentage = if span == 0 {
        MIDPOINT
    } else {
        let raw = f64::from(tally.score - tally.min_score) / f64::from(span) * 100.0;
        (raw * 10.0).round() / 10.0
    };

    SpectrumPlacement {
        domain_id: domain.id.clone(),
        opposite: domain.opposite.clone().unwrap_or_default(),
        position: position_for(percentage, balance_band),
        percentage,
    }
}

pub(crate) fn position_for(percentage: f64, balance_band: f64) -> SpectrumPosition {
    if percentage > MIDPOINT + balance_band {
        SpectrumPosition::First
    } else if percentage < MIDPOINT - balance_band {
        SpectrumPosition::Opposite
    } else {
        SpectrumPosition::Balanced
    }
}
