use teripang_schemas::mode::AnalysisMode;
use thiserror::Error;

/// Coarse classification of a [`TeripangError`] for callers that branch on
/// the failure rather than on its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    InvalidParameter,
    InsufficientData,
    NoProcessableData,
    Io,
}

#[derive(Debug, Error)]
pub enum TeripangError {
    #[error("No valid records found in input for {0} mode")]
    EmptyInput(AnalysisMode),

    #[error("No data loaded for {0} mode; load input before running the analysis")]
    NoDataLoaded(AnalysisMode),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Loaded records are for {loaded} mode but {requested} analysis was requested")]
    ModeMismatch {
        loaded: AnalysisMode,
        requested: AnalysisMode,
    },

    #[error("Insufficient data for {context}: at least {required} records required, found {found}")]
    InsufficientData {
        context: &'static str,
        required: usize,
        found: usize,
    },

    #[error("No processable data: {0}")]
    NoProcessableData(String),

    #[error("Failed to write CSV results: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error while writing results: {0}")]
    FileIO(#[from] std::io::Error),
}

impl TeripangError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput(_) | Self::NoDataLoaded(_) => ErrorKind::EmptyInput,
            Self::InvalidParameter { .. } | Self::ModeMismatch { .. } => ErrorKind::InvalidParameter,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::NoProcessableData(_) => ErrorKind::NoProcessableData,
            Self::CsvError(_) | Self::FileIO(_) => ErrorKind::Io,
        }
    }
}

/// Rejects parameters that are not finite or not strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, TeripangError> {
    if !value.is_finite() {
        return Err(TeripangError::invalid_parameter(name, "must be a finite number"));
    }
    if value <= 0.0 {
        return Err(TeripangError::invalid_parameter(
            name,
            format!("must be greater than zero (got {value})"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_group_related_variants() {
        assert_eq!(TeripangError::NoDataLoaded(AnalysisMode::Age).kind(), ErrorKind::EmptyInput);
        assert_eq!(
            TeripangError::ModeMismatch {
                loaded: AnalysisMode::Age,
                requested: AnalysisMode::Lwr
            }
            .kind(),
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            TeripangError::NoProcessableData("x".into()).kind(),
            ErrorKind::NoProcessableData
        );
    }

    #[test]
    fn require_positive_rejects_zero_negative_and_nan() {
        assert!(require_positive("k", 0.34).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = require_positive("k", bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn messages_name_the_parameter() {
        let err = require_positive("linf", -3.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'linf': must be greater than zero (got -3)"
        );
    }
}
