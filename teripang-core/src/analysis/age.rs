//! Age-at-length prediction with the Von Bertalanffy growth model.
//!
//! Age is the inverse of `L(t) = linf * (1 - exp(-k * t))`:
//! `t = -(1 / k) * ln(1 - L / linf)`, defined only for `0 < L < linf`.

use super::interpretation::{AgeInterpretation, SpeciesInfo};
use crate::{
    error::{require_positive, TeripangError},
    regression::LinearFit,
    stats::Statistics,
};
use serde::Serialize;
use teripang_schemas::{
    classification::ClassificationTable,
    measurement::Measurement,
    species::{GrowthParameters, SpeciesDatabase},
};
use tracing::{debug, info};

/// Upper bound on the number of steps in a growth curve (fifty years monthly).
pub const MAX_CURVE_STEPS: usize = 600;

/// Age prediction for one specimen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeResult {
    pub length: f64,
    /// Age in years.
    pub age: f64,
    pub age_months: f64,
    /// Expected length one year after `age`.
    pub predicted_length: f64,
}

/// A point on the growth curve, for plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub age_months: f64,
    pub length: f64,
}

/// Applies a validated set of growth parameters to measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeAnalyzer {
    params: GrowthParameters,
}

impl AgeAnalyzer {
    /// # Errors
    ///
    /// Returns [`TeripangError::InvalidParameter`] unless `linf` and `k` are
    /// finite and strictly positive.
    pub fn new(params: GrowthParameters) -> Result<Self, TeripangError> {
        require_positive("linf", params.linf)?;
        require_positive("k", params.k)?;
        Ok(Self { params })
    }

    pub fn params(&self) -> GrowthParameters {
        self.params
    }

    /// Age in years at `length`, or `None` when `length` is not in `(0, linf)`.
    pub fn age_at_length(&self, length: f64) -> Option<f64> {
        let GrowthParameters { linf, k } = self.params;
        if !(length > 0.0 && length < linf) {
            return None;
        }
        Some(-(1.0 / k) * (1.0 - length / linf).ln())
    }

    /// Expected length at `age` years.
    pub fn length_at_age(&self, age: f64) -> f64 {
        let GrowthParameters { linf, k } = self.params;
        linf * (1.0 - (-k * age).exp())
    }

    pub fn result_for(&self, length: f64) -> Option<AgeResult> {
        let age = self.age_at_length(length)?;
        Some(AgeResult {
            length,
            age,
            age_months: age * 12.0,
            predicted_length: self.length_at_age(age + 1.0),
        })
    }

    /// One result per measurement shorter than `linf`, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`TeripangError::NoProcessableData`] when every measurement is
    /// excluded.
    pub fn analyze(&self, measurements: &[Measurement]) -> Result<Vec<AgeResult>, TeripangError> {
        let results = measurements
            .iter()
            .filter_map(|m| self.result_for(m.length))
            .collect::<Vec<_>>();
        if results.is_empty() {
            return Err(TeripangError::NoProcessableData(format!(
                "all {} lengths are at or above linf ({})",
                measurements.len(),
                self.params.linf
            )));
        }
        Ok(results)
    }

    /// Curve samples from birth to `max_age_months`.
    ///
    /// Steps are monthly while that stays within [`MAX_CURVE_STEPS`]; longer
    /// spans use a whole-month step wide enough to keep the point count bounded.
    pub fn growth_curve(&self, max_age_months: f64) -> Vec<CurvePoint> {
        if !max_age_months.is_finite() || max_age_months < 0.0 {
            return Vec::new();
        }
        let step = (max_age_months / MAX_CURVE_STEPS as f64).ceil().max(1.0);
        let steps = (max_age_months / step).floor().min(MAX_CURVE_STEPS as f64) as usize;
        (0..=steps)
            .map(|i| {
                let age_months = i as f64 * step;
                CurvePoint {
                    age_months,
                    length: self.length_at_age(age_months / 12.0),
                }
            })
            .collect()
    }
}

/// Resolves growth parameters field by field: explicit value, then the
/// species table entry, then [`GrowthParameters::DEFAULT`].
pub fn resolve_growth(
    linf: Option<f64>,
    k: Option<f64>,
    species: Option<&str>,
    db: &SpeciesDatabase,
) -> GrowthParameters {
    let reference = species.and_then(|name| db.get(name)).map(|p| p.growth());
    let default = GrowthParameters::DEFAULT;
    GrowthParameters {
        linf: linf
            .or(reference.map(|p| p.linf))
            .unwrap_or(default.linf),
        k: k.or(reference.map(|p| p.k)).unwrap_or(default.k),
    }
}

/// Complete result set of age mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeAnalysis {
    pub params: GrowthParameters,
    pub species: Option<String>,
    pub records: Vec<AgeResult>,
    /// Measurements dropped because their length was not below `linf`.
    pub excluded: usize,
    pub length_stats: Statistics,
    pub age_stats: Statistics,
    /// Predicted length regressed on observed length; absent below two results.
    pub prediction_fit: Option<LinearFit>,
    pub interpretation: AgeInterpretation,
}

impl AgeAnalysis {
    pub fn run(
        analyzer: &AgeAnalyzer,
        measurements: &[Measurement],
        species: Option<&str>,
        db: &SpeciesDatabase,
        classifications: &ClassificationTable,
    ) -> Result<Self, TeripangError> {
        let records = analyzer.analyze(measurements)?;
        let excluded = measurements.len() - records.len();
        debug!(
            linf = analyzer.params.linf,
            k = analyzer.params.k,
            excluded,
            "computed ages"
        );

        let length_stats = Statistics::of(&records, |r| r.length);
        let age_stats = Statistics::of(&records, |r| r.age);
        let points = records
            .iter()
            .map(|r| (r.length, r.predicted_length))
            .collect::<Vec<_>>();
        let prediction_fit = LinearFit::fit(&points).ok();

        let interpretation = AgeInterpretation {
            avg_length: length_stats.avg,
            avg_age: age_stats.avg,
            phase: classifications
                .classify(length_stats.avg, species)
                .map(str::to_string),
            species: SpeciesInfo::lookup(db, species),
        };
        info!(
            records = records.len(),
            avg_age = age_stats.avg,
            "age analysis complete"
        );

        Ok(Self {
            params: analyzer.params,
            species: species.map(str::to_string),
            records,
            excluded,
            length_stats,
            age_stats,
            prediction_fit,
            interpretation,
        })
    }

    /// The fitted growth curve, extended one year past the oldest specimen.
    pub fn growth_curve(&self) -> Vec<CurvePoint> {
        let analyzer = AgeAnalyzer {
            params: self.params,
        };
        analyzer.growth_curve(self.age_stats.max * 12.0 + 12.0)
    }
}
