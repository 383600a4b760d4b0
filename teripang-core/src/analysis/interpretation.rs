//! Interpretive labels derived from computed values: growth pattern from the
//! LWR exponent, condition bands from Fulton's K, and reference text for the
//! analysed species.

use serde::Serialize;
use std::fmt;
use teripang_schemas::species::SpeciesDatabase;

/// Individuals at or above this K are counted as being in good condition.
pub const GOOD_CONDITION_THRESHOLD: f64 = 1.0;

/// Growth pattern implied by the length-weight exponent `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthPattern {
    NegativeAllometric,
    Isometric,
    PositiveAllometric,
}

impl GrowthPattern {
    /// `b < 2.5` is negative, `b > 3.5` positive; the closed range between is isometric.
    pub fn from_exponent(b: f64) -> Self {
        if b < 2.5 {
            Self::NegativeAllometric
        } else if b > 3.5 {
            Self::PositiveAllometric
        } else {
            Self::Isometric
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NegativeAllometric => "negative allometric",
            Self::Isometric => "isometric",
            Self::PositiveAllometric => "positive allometric",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Self::NegativeAllometric => "body grows more elongated with size",
            Self::Isometric => "body proportions are preserved with size",
            Self::PositiveAllometric => "body grows stouter with size",
        }
    }
}

impl fmt::Display for GrowthPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Band of an average Fulton condition factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionClass {
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl ConditionClass {
    pub fn from_factor(k: f64) -> Self {
        if k >= 1.2 {
            Self::VeryGood
        } else if k >= 1.0 {
            Self::Good
        } else if k >= 0.8 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryGood => "very good",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for ConditionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Distribution of individual condition factors around the good-condition threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConditionSummary {
    pub avg: f64,
    pub class: ConditionClass,
    pub good_count: usize,
    pub poor_count: usize,
    pub good_percentage: f64,
    pub poor_percentage: f64,
}

impl ConditionSummary {
    /// Returns `None` for an empty slice.
    pub fn from_factors(factors: &[f64]) -> Option<Self> {
        if factors.is_empty() {
            return None;
        }
        let n = factors.len() as f64;
        let avg = factors.iter().sum::<f64>() / n;
        let good_count = factors
            .iter()
            .filter(|k| **k >= GOOD_CONDITION_THRESHOLD)
            .count();
        let poor_count = factors.len() - good_count;
        Some(Self {
            avg,
            class: ConditionClass::from_factor(avg),
            good_count,
            poor_count,
            good_percentage: good_count as f64 / n * 100.0,
            poor_percentage: poor_count as f64 / n * 100.0,
        })
    }
}

/// Reference text for a species found in the species table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesInfo {
    pub name: String,
    pub common_name: String,
    pub description: String,
}

impl SpeciesInfo {
    pub fn lookup(db: &SpeciesDatabase, name: Option<&str>) -> Option<Self> {
        let name = name?;
        db.get(name).map(|params| Self {
            name: name.to_string(),
            common_name: params.common_name.clone(),
            description: params.description.clone(),
        })
    }
}

/// Population-level reading of an age analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeInterpretation {
    pub avg_length: f64,
    pub avg_age: f64,
    /// Life-stage phase of the average length; `None` when no rule matches.
    pub phase: Option<String>,
    pub species: Option<SpeciesInfo>,
}
