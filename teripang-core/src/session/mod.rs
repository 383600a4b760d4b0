//! Mode-scoped session holding the loaded records and the last result set.
//!
//! ```text
//! Empty --load--> DataLoaded --analyze--> ResultsComputed
//!   ^                                          |
//!   +-------- switch_mode / reset -------------+
//! ```

pub mod builder;
pub mod state;

pub use self::{builder::SessionBuilder, state::SessionState};

use crate::{
    analysis::{AnalysisParams, AnalysisResult},
    error::TeripangError,
    parser::{self, ParsedRecords},
    pipeline::{self, ReferenceTables},
};
use teripang_schemas::mode::AnalysisMode;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    mode: AnalysisMode,
    records: Option<ParsedRecords>,
    results: Option<AnalysisResult>,
    tables: ReferenceTables,
}

impl AnalysisSession {
    pub(crate) fn new(mode: AnalysisMode, tables: ReferenceTables) -> Self {
        Self {
            mode,
            records: None,
            results: None,
            tables,
        }
    }

    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        match (&self.records, &self.results) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::DataLoaded,
            (Some(_), Some(_)) => SessionState::ResultsComputed,
        }
    }

    pub fn records(&self) -> Option<&ParsedRecords> {
        self.records.as_ref()
    }

    pub fn results(&self) -> Option<&AnalysisResult> {
        self.results.as_ref()
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Enters `mode`, discarding loaded records and results even when the
    /// mode is unchanged.
    pub fn switch_mode(&mut self, mode: AnalysisMode) {
        debug!(from = %self.mode, to = %mode, "switching mode");
        self.mode = mode;
        self.reset();
    }

    /// Returns to [`SessionState::Empty`] without changing mode.
    pub fn reset(&mut self) {
        self.records = None;
        self.results = None;
    }

    /// Parses `text` for the current mode and replaces any loaded records.
    ///
    /// Prior results are always discarded. When parsing fails the session is
    /// left empty.
    pub fn load_text(&mut self, text: &str) -> Result<usize, TeripangError> {
        self.reset();
        let records = parser::parse(text, self.mode)?;
        let count = records.len();
        info!(mode = %self.mode, records = count, "loaded input");
        self.records = Some(records);
        Ok(count)
    }

    /// Replaces the loaded records with ones parsed elsewhere.
    ///
    /// # Errors
    ///
    /// [`TeripangError::ModeMismatch`] when `records` belong to another mode,
    /// [`TeripangError::EmptyInput`] when they are empty. The session is left
    /// unchanged on error.
    pub fn load_records(&mut self, records: ParsedRecords) -> Result<usize, TeripangError> {
        if records.mode() != self.mode {
            return Err(TeripangError::ModeMismatch {
                loaded: records.mode(),
                requested: self.mode,
            });
        }
        if records.is_empty() {
            return Err(TeripangError::EmptyInput(self.mode));
        }
        let count = records.len();
        self.results = None;
        self.records = Some(records);
        Ok(count)
    }

    /// Analyses the loaded records, replacing any previous results.
    ///
    /// On error no results are kept and the session stays in
    /// [`SessionState::DataLoaded`].
    ///
    /// # Errors
    ///
    /// [`TeripangError::NoDataLoaded`] in the empty state, otherwise any
    /// validation or analysis error.
    pub fn analyze(&mut self, params: &AnalysisParams) -> Result<&AnalysisResult, TeripangError> {
        self.results = None;
        let records = self
            .records
            .as_ref()
            .ok_or(TeripangError::NoDataLoaded(self.mode))?;
        pipeline::validate(records, self.mode, params)?;
        let results = pipeline::analyze(records, params, &self.tables)?;
        Ok(self.results.insert(results))
    }
}
