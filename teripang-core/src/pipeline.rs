//! The pure analysis pipeline: `parse -> validate -> analyze`.
//!
//! Every step returns a complete value or an error; nothing is published
//! from a run that fails part way through.

use crate::{
    analysis::{
        age::{resolve_growth, AgeAnalysis, AgeAnalyzer},
        lwr::LwrAnalysis,
        multispecies::{MultispeciesAnalyzer, MultispeciesOptions},
        AnalysisParams, AnalysisResult,
    },
    error::{require_positive, TeripangError},
    parser::{self, ParsedRecords},
};
use std::sync::Arc;
use teripang_schemas::{
    classification::ClassificationTable, mode::AnalysisMode, species::GrowthParameters,
    species::SpeciesDatabase,
};
use tracing::debug;

/// Read-only reference data shared by every run in a process.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub species: Arc<SpeciesDatabase>,
    pub classifications: Arc<ClassificationTable>,
}

impl ReferenceTables {
    pub fn new(species: SpeciesDatabase, classifications: ClassificationTable) -> Self {
        Self {
            species: Arc::new(species),
            classifications: Arc::new(classifications),
        }
    }
}

/// Checks that `records` can be analysed in `mode` with `params`.
///
/// # Errors
///
/// [`TeripangError::ModeMismatch`] when the records were parsed for another
/// mode, [`TeripangError::EmptyInput`] for an empty set, and
/// [`TeripangError::InvalidParameter`] for explicit parameters that are not
/// finite and positive or for an incomplete multispecies context.
pub fn validate(
    records: &ParsedRecords,
    mode: AnalysisMode,
    params: &AnalysisParams,
) -> Result<(), TeripangError> {
    if records.mode() != mode {
        return Err(TeripangError::ModeMismatch {
            loaded: records.mode(),
            requested: mode,
        });
    }
    if records.is_empty() {
        return Err(TeripangError::EmptyInput(mode));
    }

    match mode {
        AnalysisMode::Age => {
            check_optional("linf", params.linf)?;
            check_optional("k", params.k)?;
        }
        AnalysisMode::Lwr => {
            check_optional("a", params.a)?;
            if let Some(b) = params.b {
                if !b.is_finite() {
                    return Err(TeripangError::invalid_parameter("b", "must be a finite number"));
                }
            }
        }
        AnalysisMode::Multispecies => {
            check_optional("linf", params.linf)?;
            check_optional("k", params.k)?;
            multispecies_options(params).validate()?;
        }
    }
    Ok(())
}

/// Runs the analysis matching the mode of `records`.
pub fn analyze(
    records: &ParsedRecords,
    params: &AnalysisParams,
    tables: &ReferenceTables,
) -> Result<AnalysisResult, TeripangError> {
    let species = params.species.as_deref();
    match records {
        ParsedRecords::Age(measurements) => {
            let growth = resolve_growth(params.linf, params.k, species, &tables.species);
            debug!(linf = growth.linf, k = growth.k, ?species, "resolved growth parameters");
            let analyzer = AgeAnalyzer::new(growth)?;
            AgeAnalysis::run(
                &analyzer,
                measurements,
                species,
                &tables.species,
                &tables.classifications,
            )
            .map(AnalysisResult::Age)
        }
        ParsedRecords::Lwr(measurements) => {
            LwrAnalysis::run(measurements, params.a, params.b, species, &tables.species)
                .map(AnalysisResult::Lwr)
        }
        ParsedRecords::Multispecies(records) => {
            MultispeciesAnalyzer::new(&tables.species, multispecies_options(params))?
                .analyze(records)
                .map(AnalysisResult::Multispecies)
        }
    }
}

/// Parses, validates and analyses `text` in one call.
pub fn run(
    text: &str,
    mode: AnalysisMode,
    params: &AnalysisParams,
    tables: &ReferenceTables,
) -> Result<AnalysisResult, TeripangError> {
    let records = parser::parse(text, mode)?;
    validate(&records, mode, params)?;
    analyze(&records, params, tables)
}

fn multispecies_options(params: &AnalysisParams) -> MultispeciesOptions {
    let fallback = match (params.linf, params.k) {
        (None, None) => None,
        (linf, k) => Some(GrowthParameters {
            linf: linf.unwrap_or(GrowthParameters::DEFAULT.linf),
            k: k.unwrap_or(GrowthParameters::DEFAULT.k),
        }),
    };
    MultispeciesOptions {
        location: params.location.clone().unwrap_or_default(),
        include_age: params.include_age,
        include_lwr: params.include_lwr,
        fallback,
    }
}

fn check_optional(name: &'static str, value: Option<f64>) -> Result<(), TeripangError> {
    value.map_or(Ok(()), |v| require_positive(name, v).map(|_| ()))
}
