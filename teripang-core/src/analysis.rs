//! The three analysis modes and the closed result type they produce.

pub mod age;
pub mod interpretation;
pub mod lwr;
pub mod multispecies;

use self::{age::AgeAnalysis, lwr::LwrAnalysis, multispecies::MultispeciesAnalysis};
use serde::{Deserialize, Serialize};
use teripang_schemas::mode::AnalysisMode;

/// Caller-supplied parameters for one analysis run. Which fields matter
/// depends on the mode; the rest are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Species name used for reference-table lookups (age and LWR modes).
    pub species: Option<String>,
    pub linf: Option<f64>,
    pub k: Option<f64>,
    pub a: Option<f64>,
    pub b: Option<f64>,
    /// Sampling site; required in multispecies mode.
    pub location: Option<String>,
    pub include_age: bool,
    pub include_lwr: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            species: None,
            linf: None,
            k: None,
            a: None,
            b: None,
            location: None,
            include_age: true,
            include_lwr: true,
        }
    }
}

impl AnalysisParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn with_growth(mut self, linf: f64, k: f64) -> Self {
        self.linf = Some(linf);
        self.k = Some(k);
        self
    }

    pub fn with_lwr_parameters(mut self, a: f64, b: f64) -> Self {
        self.a = Some(a);
        self.b = Some(b);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_analyses(mut self, include_age: bool, include_lwr: bool) -> Self {
        self.include_age = include_age;
        self.include_lwr = include_lwr;
        self
    }
}

/// A complete result set for one mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AnalysisResult {
    Age(AgeAnalysis),
    Lwr(LwrAnalysis),
    Multispecies(MultispeciesAnalysis),
}

impl AnalysisResult {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            Self::Age(_) => AnalysisMode::Age,
            Self::Lwr(_) => AnalysisMode::Lwr,
            Self::Multispecies(_) => AnalysisMode::Multispecies,
        }
    }

    /// Number of rows: records for age and LWR, species groups for multispecies.
    pub fn len(&self) -> usize {
        match self {
            Self::Age(analysis) => analysis.records.len(),
            Self::Lwr(analysis) => analysis.records.len(),
            Self::Multispecies(analysis) => analysis.groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
