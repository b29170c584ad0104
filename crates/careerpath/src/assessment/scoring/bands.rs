use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const HIGH_FROM: f64 = 76.0;
const MID_FROM: f64 = 52.0;

/// Ordinal position of a band. Ordering follows score: `Low < Mid < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandLevel {
    Low,
    Mid,
    High,
}

/// Qualitative interpretation of a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub level: BandLevel,
    pub label: String,
}

/// Three-level threshold scheme for one assessment type. Percentages are of the theoretical
/// maximum score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScheme {
    high_from: f64,
    mid_from: f64,
    high_label: String,
    mid_label: String,
    low_label: String,
}

impl BandScheme {
    /// Build a scheme; the mid threshold is clamped so it never exceeds the high threshold.
    pub fn new(high_from: f64, mid_from: f64, labels: [&str; 3]) -> Self {
        let [high_label, mid_label, low_label] = labels;
        Self {
            high_from,
            mid_from: mid_from.min(high_from),
            high_label: high_label.to_string(),
            mid_label: mid_label.to_string(),
            low_label: low_label.to_string(),
        }
    }

    pub fn with_labels(labels: [&str; 3]) -> Self {
        Self::new(HIGH_FROM, MID_FROM, labels)
    }

    pub fn level_for(&self, percentage: f64) -> BandLevel {
        if percentage >= self.high_from {
            BandLevel::High
        } else if percentage >= self.mid_from {
            BandLevel::Mid
        } else {
            BandLevel::Low
        }
    }

    pub fn classify(&self, percentage: f64) -> Band {
        let level = self.level_for(percentage);
        let label = match level {
            BandLevel::High => &self.high_label,
            BandLevel::Mid => &self.mid_label,
            BandLevel::Low => &self.low_label,
        };
        Band {
            level,
            label: label.clone(),
        }
    }
}

impl Default for BandScheme {
    fn default() -> Self {
        Self::with_labels(["Strong", "Moderate", "Developing"])
    }
}

/// Band schemes keyed by assessment type (section id).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BandingConfig {
    schemes: BTreeMap<String, BandScheme>,
    fallback: BandScheme,
}

impl BandingConfig {
    pub fn standard() -> Self {
        let mut schemes = BTreeMap::new();
        schemes.insert(
            "personality".to_string(),
            BandScheme::with_labels(["High", "Mid-range", "Low"]),
        );
        schemes.insert(
            "holland".to_string(),
            BandScheme::with_labels(["High Interest", "Moderate Interest", "Low Interest"]),
        );
        schemes.insert(
            "intelligences".to_string(),
            BandScheme::with_labels(["Strong", "Moderate", "Developing"]),
        );
        schemes.insert(
            "cognitive_style".to_string(),
            BandScheme::with_labels([
                "Strong Preference",
                "Moderate Preference",
                "Mild Preference",
            ]),
        );
        schemes.insert(
            "stress_response".to_string(),
            BandScheme::with_labels(["Well Managed", "Developing", "Needs Focus"]),
        );
        schemes.insert(
            "skills".to_string(),
            BandScheme::with_labels(["Strong", "Developing", "Needs Focus"]),
        );
        schemes.insert(
            "grit".to_string(),
            BandScheme::with_labels(["High", "Moderate", "Low"]),
        );

        Self {
            schemes,
            fallback: BandScheme::default(),
        }
    }

    pub fn with_scheme(mut self, assessment_type: impl Into<String>, scheme: BandScheme) -> Self {
        self.schemes.insert(assessment_type.into(), scheme);
        self
    }

    pub fn scheme_for(&self, assessment_type: &str) -> &BandScheme {
        self.schemes.get(assessment_type).unwrap_or(&self.fallback)
    }

    pub fn band(&self, assessment_type: &str, percentage: f64) -> Band {
        self.scheme_for(assessment_type).classify(percentage)
    }
}
