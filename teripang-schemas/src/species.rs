//! Per-species reference parameters, looked up by scientific name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Von Bertalanffy growth parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthParameters {
    /// Asymptotic length (cm).
    pub linf: f64,
    /// Growth-rate constant (per year).
    pub k: f64,
}

impl GrowthParameters {
    /// Used when neither the caller nor the reference table supplies values.
    pub const DEFAULT: Self = Self {
        linf: 30.66,
        k: 0.34,
    };

    pub fn new(linf: f64, k: f64) -> Self {
        Self { linf, k }
    }
}

impl Default for GrowthParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reference entry for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesParameters {
    pub linf: f64,
    pub k: f64,
    /// Length-weight coefficient of `W = a * L^b`.
    pub a: f64,
    /// Length-weight exponent of `W = a * L^b`.
    pub b: f64,
    #[serde(default)]
    pub common_name: String,
    #[serde(default)]
    pub description: String,
}

impl SpeciesParameters {
    pub fn growth(&self) -> GrowthParameters {
        GrowthParameters::new(self.linf, self.k)
    }
}

/// The species reference table, keyed by scientific name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesDatabase {
    species: BTreeMap<String, SpeciesParameters>,
}

impl SpeciesDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, params: SpeciesParameters) {
        self.species.insert(name.into(), params);
    }

    pub fn get(&self, name: &str) -> Option<&SpeciesParameters> {
        self.species.get(name)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl FromIterator<(String, SpeciesParameters)> for SpeciesDatabase {
    fn from_iter<I: IntoIterator<Item = (String, SpeciesParameters)>>(iter: I) -> Self {
        Self {
            species: iter.into_iter().collect(),
        }
    }
}
