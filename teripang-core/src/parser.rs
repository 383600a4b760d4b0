//! Converts raw delimited text into typed measurement records.
//!
//! Malformed rows are never errors: they are counted, logged and dropped.
//! Only an input in which no row survives is reported, as
//! [`TeripangError::EmptyInput`].

use crate::error::TeripangError;
use csv::{ReaderBuilder, StringRecord, Trim};
use teripang_schemas::{
    measurement::{Measurement, SpeciesMeasurement},
    mode::AnalysisMode,
};
use tracing::debug;

/// Records parsed for one analysis mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecords {
    Age(Vec<Measurement>),
    Lwr(Vec<Measurement>),
    Multispecies(Vec<SpeciesMeasurement>),
}

impl ParsedRecords {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            Self::Age(_) => AnalysisMode::Age,
            Self::Lwr(_) => AnalysisMode::Lwr,
            Self::Multispecies(_) => AnalysisMode::Multispecies,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Age(records) | Self::Lwr(records) => records.len(),
            Self::Multispecies(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses `text` according to `mode`.
///
/// Lines may end in `\n`, `\r\n` or `\r`. Fields are comma separated and
/// may be double-quoted. A non-numeric header line is dropped like any other
/// malformed row.
///
/// # Errors
///
/// Returns [`TeripangError::EmptyInput`] when no row survives.
pub fn parse(text: &str, mode: AnalysisMode) -> Result<ParsedRecords, TeripangError> {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(false).flexible(true).trim(Trim::All);

    let lines = text
        .split(|c| c == '\n' || c == '\r')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    let rows = lines
        .iter()
        .filter_map(|line| split_line(&builder, line))
        .filter(|row| row.iter().any(|field| !field.is_empty()))
        .collect::<Vec<_>>();

    let parsed = match mode {
        AnalysisMode::Age => ParsedRecords::Age(rows.iter().filter_map(parse_age_row).collect()),
        AnalysisMode::Lwr => ParsedRecords::Lwr(rows.iter().filter_map(parse_lwr_row).collect()),
        AnalysisMode::Multispecies => {
            ParsedRecords::Multispecies(rows.iter().filter_map(parse_species_row).collect())
        }
    };

    debug!(
        %mode,
        lines = lines.len(),
        kept = parsed.len(),
        dropped = lines.len() - parsed.len(),
        "parsed input"
    );

    if parsed.is_empty() {
        return Err(TeripangError::EmptyInput(mode));
    }
    Ok(parsed)
}

/// Splits one line into fields. A line with an unterminated quote is malformed.
fn split_line(builder: &ReaderBuilder, line: &str) -> Option<StringRecord> {
    if line.matches('"').count() % 2 != 0 {
        return None;
    }
    builder.from_reader(line.as_bytes()).records().next()?.ok()
}

fn parse_number(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn positive_field(row: &StringRecord, index: usize) -> Option<f64> {
    row.get(index).and_then(parse_number).filter(|value| *value > 0.0)
}

fn parse_age_row(row: &StringRecord) -> Option<Measurement> {
    positive_field(row, 0).map(Measurement::length_only)
}

fn parse_lwr_row(row: &StringRecord) -> Option<Measurement> {
    let length = positive_field(row, 0)?;
    let weight = positive_field(row, 1)?;
    Some(Measurement::with_weight(length, weight))
}

fn parse_species_row(row: &StringRecord) -> Option<SpeciesMeasurement> {
    let species = row.get(0).filter(|name| !name.is_empty())?;
    let length = positive_field(row, 1)?;
    let weight = positive_field(row, 2)?;
    Some(SpeciesMeasurement {
        species: species.to_string(),
        length,
        weight,
    })
}
