//! Per-species age and length-weight analysis of a mixed sample.

use super::{
    age::AgeAnalyzer,
    interpretation::{ConditionClass, ConditionSummary, GrowthPattern},
    lwr::{condition_factor, LwrParameters},
};
use crate::{error::TeripangError, stats::Statistics};
use serde::Serialize;
use std::collections::HashMap;
use teripang_schemas::{
    measurement::{Measurement, SpeciesMeasurement},
    mode::AnalysisMode,
    species::{GrowthParameters, SpeciesDatabase},
};
use tracing::{debug, info, warn};

/// Groups smaller than this omit their length-weight block.
pub const MIN_LWR_GROUP_SIZE: usize = 3;

/// Invocation context of a multispecies run.
#[derive(Debug, Clone, PartialEq)]
pub struct MultispeciesOptions {
    /// Sampling site attached to every group result.
    pub location: String,
    pub include_age: bool,
    pub include_lwr: bool,
    /// Growth parameters for species missing from the reference table.
    pub fallback: Option<GrowthParameters>,
}

impl MultispeciesOptions {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            include_age: true,
            include_lwr: true,
            fallback: None,
        }
    }

    /// # Errors
    ///
    /// [`TeripangError::InvalidParameter`] for a blank location, when both
    /// analyses are disabled, or for an invalid fallback.
    pub fn validate(&self) -> Result<(), TeripangError> {
        if self.location.trim().is_empty() {
            return Err(TeripangError::invalid_parameter(
                "location",
                "a sampling location is required for multispecies analysis",
            ));
        }
        if !self.include_age && !self.include_lwr {
            return Err(TeripangError::invalid_parameter(
                "analysis",
                "select at least one of age or length-weight analysis",
            ));
        }
        if let Some(fallback) = self.fallback {
            AgeAnalyzer::new(fallback)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupAge {
    pub params: GrowthParameters,
    /// Mean age over specimens shorter than `linf`; `None` if there are none.
    pub avg_age: Option<f64>,
    pub aged_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupLwr {
    pub a: f64,
    pub b: f64,
    pub r2: f64,
    pub growth_pattern: GrowthPattern,
    pub avg_condition: f64,
    pub condition_interpretation: ConditionClass,
    pub good_condition_count: usize,
    pub good_condition_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesGroupResult {
    pub species: String,
    pub location: String,
    pub count: usize,
    pub length_stats: Statistics,
    pub weight_stats: Statistics,
    pub age: Option<GroupAge>,
    pub lwr: Option<GroupLwr>,
}

/// Complete result set of multispecies mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultispeciesAnalysis {
    pub location: String,
    pub total_records: usize,
    /// One entry per species, in order of first appearance.
    pub groups: Vec<SpeciesGroupResult>,
}

/// Splits records by species, keeping the order in which species first appear.
pub fn group_by_species(records: &[SpeciesMeasurement]) -> Vec<(&str, Vec<Measurement>)> {
    let mut index = HashMap::new();
    let mut groups: Vec<(&str, Vec<Measurement>)> = Vec::new();
    for record in records {
        let slot = *index.entry(record.species.as_str()).or_insert_with(|| {
            groups.push((record.species.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record.measurement());
    }
    groups
}

pub struct MultispeciesAnalyzer<'a> {
    species_db: &'a SpeciesDatabase,
    options: MultispeciesOptions,
}

impl<'a> MultispeciesAnalyzer<'a> {
    pub fn new(species_db: &'a SpeciesDatabase, options: MultispeciesOptions) -> Result<Self, TeripangError> {
        options.validate()?;
        Ok(Self {
            species_db,
            options,
        })
    }

    pub fn analyze(&self, records: &[SpeciesMeasurement]) -> Result<MultispeciesAnalysis, TeripangError> {
        if records.is_empty() {
            return Err(TeripangError::EmptyInput(AnalysisMode::Multispecies));
        }

        let groups = group_by_species(records)
            .into_iter()
            .map(|(species, measurements)| self.analyze_group(species, &measurements))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            location = %self.options.location,
            species = groups.len(),
            records = records.len(),
            "multispecies analysis complete"
        );
        Ok(MultispeciesAnalysis {
            location: self.options.location.clone(),
            total_records: records.len(),
            groups,
        })
    }

    fn analyze_group(
        &self,
        species: &str,
        measurements: &[Measurement],
    ) -> Result<SpeciesGroupResult, TeripangError> {
        debug!(species, count = measurements.len(), "analysing species group");
        let age = if self.options.include_age {
            Some(self.group_age(species, measurements)?)
        } else {
            None
        };
        let lwr = if self.options.include_lwr {
            self.group_lwr(species, measurements)
        } else {
            None
        };

        Ok(SpeciesGroupResult {
            species: species.to_string(),
            location: self.options.location.clone(),
            count: measurements.len(),
            length_stats: Statistics::of(measurements, |m| m.length),
            weight_stats: Statistics::compute(measurements.iter().filter_map(|m| m.weight)),
            age,
            lwr,
        })
    }

    /// Table entry first, then the caller's fallback, then the default, per field.
    fn growth_for(&self, species: &str) -> GrowthParameters {
        let usable = |v: &f64| v.is_finite() && *v > 0.0;
        let reference = self.species_db.get(species);
        let fallback = self.options.fallback.unwrap_or_default();
        GrowthParameters {
            linf: reference
                .map(|p| p.linf)
                .filter(usable)
                .unwrap_or(fallback.linf),
            k: reference.map(|p| p.k).filter(usable).unwrap_or(fallback.k),
        }
    }

    fn group_age(&self, species: &str, measurements: &[Measurement]) -> Result<GroupAge, TeripangError> {
        let analyzer = AgeAnalyzer::new(self.growth_for(species))?;
        let ages = measurements
            .iter()
            .filter_map(|m| analyzer.age_at_length(m.length))
            .filter(|age| *age > 0.0)
            .collect::<Vec<_>>();
        let stats = Statistics::compute(ages);
        Ok(GroupAge {
            params: analyzer.params(),
            avg_age: (!stats.is_empty()).then_some(stats.avg),
            aged_count: stats.count,
        })
    }

    fn group_lwr(&self, species: &str, measurements: &[Measurement]) -> Option<GroupLwr> {
        if measurements.len() < MIN_LWR_GROUP_SIZE {
            debug!(species, count = measurements.len(), "group too small for length-weight fit");
            return None;
        }
        let (params, fit) = match LwrParameters::fit(measurements) {
            Ok(fitted) => fitted,
            Err(err) => {
                warn!(species, %err, "skipping length-weight fit");
                return None;
            }
        };
        let factors = measurements
            .iter()
            .filter_map(|m| m.positive_weight().map(|w| condition_factor(m.length, w)))
            .collect::<Vec<_>>();
        let condition = ConditionSummary::from_factors(&factors)?;

        Some(GroupLwr {
            a: params.a,
            b: params.b,
            r2: fit.r2,
            growth_pattern: params.growth_pattern(),
            avg_condition: condition.avg,
            condition_interpretation: condition.class,
            good_condition_count: condition.good_count,
            good_condition_percentage: condition.good_percentage,
        })
    }
}
