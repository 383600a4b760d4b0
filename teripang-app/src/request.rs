use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use teripang_core::analysis::AnalysisParams;
use teripang_schemas::mode::AnalysisMode;

/// One analysis run described in a YAML file.
///
/// ```yaml
/// mode: multispecies
/// input: samples/lampung.csv
/// params:
///   location: Lampung Bay
///   include_lwr: false
/// ```
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    /// Measurement file; relative paths are resolved against the request file.
    pub input: PathBuf,
    #[serde(default)]
    pub params: AnalysisParams,
}

impl AnalysisRequest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?;
        let mut request: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse request file {}", path.display()))?;
        if request.input.is_relative() {
            if let Some(dir) = path.parent() {
                request.input = dir.join(&request.input);
            }
        }
        Ok(request)
    }
}
