//! Length-weight relationship `W = a * L^b` and Fulton's condition factor.

use super::interpretation::{ConditionSummary, GrowthPattern, SpeciesInfo};
use crate::{
    error::{require_positive, TeripangError},
    regression::LinearFit,
    stats::Statistics,
};
use serde::Serialize;
use teripang_schemas::{measurement::Measurement, mode::AnalysisMode, species::SpeciesDatabase};
use tracing::{debug, info};

/// Fulton's condition factor `K = W / L^3 * 100` for length in cm and weight in g.
pub fn condition_factor(length: f64, weight: f64) -> f64 {
    weight / length.powi(3) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LwrParameters {
    pub a: f64,
    pub b: f64,
}

impl LwrParameters {
    /// # Errors
    ///
    /// `a` must be finite and strictly positive, `b` finite.
    pub fn new(a: f64, b: f64) -> Result<Self, TeripangError> {
        require_positive("a", a)?;
        if !b.is_finite() {
            return Err(TeripangError::invalid_parameter("b", "must be a finite number"));
        }
        Ok(Self { a, b })
    }

    pub fn predict_weight(&self, length: f64) -> f64 {
        self.a * length.powf(self.b)
    }

    pub fn growth_pattern(&self) -> GrowthPattern {
        GrowthPattern::from_exponent(self.b)
    }

    /// Fits `log10(W) = b * log10(L) + log10(a)` over measurements that carry
    /// a positive weight.
    ///
    /// # Errors
    ///
    /// [`TeripangError::InsufficientData`] below two usable measurements, and
    /// [`TeripangError::NoProcessableData`] when every length is identical.
    pub fn fit(measurements: &[Measurement]) -> Result<(Self, LinearFit), TeripangError> {
        let points = measurements
            .iter()
            .filter_map(|m| m.positive_weight().map(|w| (m.length.log10(), w.log10())))
            .collect::<Vec<_>>();
        let fit = LinearFit::fit(&points)?;
        if fit.degenerate {
            return Err(TeripangError::NoProcessableData(
                "all lengths are identical; a and b cannot be fitted".to_string(),
            ));
        }
        let params = Self {
            a: 10f64.powf(fit.intercept),
            b: fit.slope,
        };
        debug!(a = params.a, b = params.b, r2 = fit.r2, "fitted length-weight parameters");
        Ok((params, fit))
    }
}

/// Where the parameters of an LWR analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    Supplied,
    Species,
    Fitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LwrResult {
    pub length: f64,
    pub weight_actual: f64,
    pub weight_predicted: f64,
    pub condition_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LwrAnalyzer {
    params: LwrParameters,
}

impl LwrAnalyzer {
    pub fn new(params: LwrParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> LwrParameters {
        self.params
    }

    pub fn result_for(&self, length: f64, weight: f64) -> LwrResult {
        LwrResult {
            length,
            weight_actual: weight,
            weight_predicted: self.params.predict_weight(length),
            condition_factor: condition_factor(length, weight),
        }
    }

    /// One result per measurement with positive length and weight, in input order.
    pub fn analyze(&self, measurements: &[Measurement]) -> Vec<LwrResult> {
        measurements
            .iter()
            .filter_map(|m| m.positive_weight().map(|w| self.result_for(m.length, w)))
            .collect()
    }
}

/// Complete result set of LWR mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LwrAnalysis {
    pub params: LwrParameters,
    pub source: ParameterSource,
    /// The log-log regression, when the parameters were fitted.
    pub log_fit: Option<LinearFit>,
    pub growth_pattern: GrowthPattern,
    pub records: Vec<LwrResult>,
    pub length_stats: Statistics,
    pub weight_stats: Statistics,
    pub condition_stats: Statistics,
    /// R² of predicted weight regressed on actual weight.
    pub prediction_r2: Option<f64>,
    pub condition: ConditionSummary,
    pub species: Option<SpeciesInfo>,
}

impl LwrAnalysis {
    /// Runs LWR mode. Parameters come from `a` and `b` when both are given,
    /// then from the species table entry, and are otherwise fitted.
    pub fn run(
        measurements: &[Measurement],
        a: Option<f64>,
        b: Option<f64>,
        species: Option<&str>,
        db: &SpeciesDatabase,
    ) -> Result<Self, TeripangError> {
        let usable = measurements
            .iter()
            .filter(|m| m.positive_weight().is_some())
            .copied()
            .collect::<Vec<_>>();
        if usable.is_empty() {
            return Err(TeripangError::EmptyInput(AnalysisMode::Lwr));
        }

        let reference = species.and_then(|name| db.get(name));
        let (params, source, log_fit) = match (a, b, reference) {
            (Some(a), Some(b), _) => (LwrParameters::new(a, b)?, ParameterSource::Supplied, None),
            (_, _, Some(reference)) => (
                LwrParameters::new(reference.a, reference.b)?,
                ParameterSource::Species,
                None,
            ),
            _ => {
                let (params, fit) = LwrParameters::fit(&usable)?;
                (params, ParameterSource::Fitted, Some(fit))
            }
        };

        let records = LwrAnalyzer::new(params).analyze(&usable);
        let factors = records.iter().map(|r| r.condition_factor).collect::<Vec<_>>();
        let condition = ConditionSummary::from_factors(&factors)
            .ok_or(TeripangError::EmptyInput(AnalysisMode::Lwr))?;
        let prediction_points = records
            .iter()
            .map(|r| (r.weight_actual, r.weight_predicted))
            .collect::<Vec<_>>();
        let prediction_r2 = LinearFit::fit(&prediction_points).ok().map(|fit| fit.r2);

        info!(
            records = records.len(),
            a = params.a,
            b = params.b,
            ?source,
            avg_condition = condition.avg,
            "length-weight analysis complete"
        );

        Ok(Self {
            params,
            source,
            log_fit,
            growth_pattern: params.growth_pattern(),
            length_stats: Statistics::of(&records, |r| r.length),
            weight_stats: Statistics::of(&records, |r| r.weight_actual),
            condition_stats: Statistics::compute(factors),
            records,
            prediction_r2,
            condition,
            species: SpeciesInfo::lookup(db, species),
        })
    }
}
