use serde::Serialize;

/// Lifecycle of an [`AnalysisSession`](super::AnalysisSession) within one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No records loaded. Analysis is refused.
    Empty,
    /// Records parsed, nothing computed yet (or the last run failed).
    DataLoaded,
    ResultsComputed,
}
