use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The three fixed analysis modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Age-at-length from the Von Bertalanffy growth model.
    #[default]
    Age,
    /// Length-weight relationship with Fulton's condition factor.
    Lwr,
    /// Age and length-weight analysis per species.
    Multispecies,
}

impl AnalysisMode {
    pub const ALL: [Self; 3] = [Self::Age, Self::Lwr, Self::Multispecies];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Lwr => "lwr",
            Self::Multispecies => "multispecies",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModeError(pub String);

impl fmt::Display for UnknownModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown analysis mode '{}' (expected age, lwr or multispecies)", self.0)
    }
}

impl std::error::Error for UnknownModeError {}

impl FromStr for AnalysisMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}
