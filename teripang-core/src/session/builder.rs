use super::AnalysisSession;
use crate::pipeline::ReferenceTables;
use teripang_schemas::mode::AnalysisMode;

/// A fluent builder for constructing an [`AnalysisSession`].
///
/// Without reference tables every species lookup falls back and no length
/// can be classified.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    mode: AnalysisMode,
    tables: ReferenceTables,
}

impl SessionBuilder {
    /// Creates a builder for an age-mode session with empty reference tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mode the session starts in.
    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shares tables already loaded for another session.
    pub fn with_reference_tables(mut self, tables: &ReferenceTables) -> Self {
        self.tables = tables.clone();
        self
    }

    /// Consumes the builder and returns an empty session.
    pub fn build(self) -> AnalysisSession {
        AnalysisSession::new(self.mode, self.tables)
    }
}
