use crate::analysis::{
    age::AgeAnalysis, lwr::LwrAnalysis, multispecies::MultispeciesAnalysis, AnalysisResult,
};
use crate::error::TeripangError;
use csv::Writer;
use serde::Serialize;
use std::{fs, io, path::Path};

#[derive(Debug, Serialize)]
struct AgeRow {
    length_cm: f64,
    age_years: f64,
    age_months: f64,
    predicted_length_next_year_cm: f64,
}

#[derive(Debug, Serialize)]
struct LwrRow {
    length_cm: f64,
    weight_actual_g: f64,
    weight_predicted_g: f64,
    condition_factor: f64,
}

#[derive(Debug, Serialize)]
struct SpeciesRow<'a> {
    species: &'a str,
    location: &'a str,
    count: usize,
    avg_length_cm: f64,
    min_length_cm: f64,
    max_length_cm: f64,
    avg_weight_g: f64,
    avg_age_years: Option<f64>,
    a: Option<f64>,
    b: Option<f64>,
    r2: Option<f64>,
    growth_pattern: Option<&'static str>,
    avg_condition: Option<f64>,
    condition: Option<&'static str>,
    good_condition_count: Option<usize>,
    good_condition_percentage: Option<f64>,
}

/// Serializes result sets as CSV with a header row.
///
/// Values are written at full precision; rounding is left to whoever
/// presents the file.
pub struct ResultWriter<W: io::Write> {
    writer: Writer<W>,
}

impl ResultWriter<fs::File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, TeripangError> {
        Ok(Self {
            writer: Writer::from_path(path)?,
        })
    }
}

impl<W: io::Write> ResultWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::from_writer(inner),
        }
    }

    pub fn write(&mut self, result: &AnalysisResult) -> Result<(), TeripangError> {
        match result {
            AnalysisResult::Age(analysis) => self.write_age(analysis),
            AnalysisResult::Lwr(analysis) => self.write_lwr(analysis),
            AnalysisResult::Multispecies(analysis) => self.write_multispecies(analysis),
        }
    }

    pub fn write_age(&mut self, analysis: &AgeAnalysis) -> Result<(), TeripangError> {
        for record in &analysis.records {
            self.writer.serialize(AgeRow {
                length_cm: record.length,
                age_years: record.age,
                age_months: record.age_months,
                predicted_length_next_year_cm: record.predicted_length,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_lwr(&mut self, analysis: &LwrAnalysis) -> Result<(), TeripangError> {
        for record in &analysis.records {
            self.writer.serialize(LwrRow {
                length_cm: record.length,
                weight_actual_g: record.weight_actual,
                weight_predicted_g: record.weight_predicted,
                condition_factor: record.condition_factor,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_multispecies(&mut self, analysis: &MultispeciesAnalysis) -> Result<(), TeripangError> {
        for group in &analysis.groups {
            let lwr = group.lwr.as_ref();
            self.writer.serialize(SpeciesRow {
                species: &group.species,
                location: &group.location,
                count: group.count,
                avg_length_cm: group.length_stats.avg,
                min_length_cm: group.length_stats.min,
                max_length_cm: group.length_stats.max,
                avg_weight_g: group.weight_stats.avg,
                avg_age_years: group.age.and_then(|age| age.avg_age),
                a: lwr.map(|l| l.a),
                b: lwr.map(|l| l.b),
                r2: lwr.map(|l| l.r2),
                growth_pattern: lwr.map(|l| l.growth_pattern.label()),
                avg_condition: lwr.map(|l| l.avg_condition),
                condition: lwr.map(|l| l.condition_interpretation.label()),
                good_condition_count: lwr.map(|l| l.good_condition_count),
                good_condition_percentage: lwr.map(|l| l.good_condition_percentage),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, TeripangError> {
        self.writer
            .into_inner()
            .map_err(|e| TeripangError::FileIO(e.into_error()))
    }
}
