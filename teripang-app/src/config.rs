use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
};
use teripang_core::pipeline::ReferenceTables;
use teripang_schemas::{
    classification::ClassificationTable,
    file_formats::{ClassificationFile, SpeciesFile},
    species::SpeciesDatabase,
};
use tracing::{info, warn};

pub const SPECIES_FILE_STEM: &str = "species_database";
pub const CLASSIFICATION_FILE_STEM: &str = "classification_rules";
const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Loads the species and classification tables from `data_dir`.
///
/// A table whose file is missing is left empty, so every lookup against it
/// falls back to defaults.
pub fn load_reference_tables(data_dir: &Path) -> Result<ReferenceTables> {
    info!("Loading reference tables from '{}'", data_dir.display());

    let species = match find_table_file(data_dir, SPECIES_FILE_STEM) {
        Some(path) => load_table_file(&path, |file: SpeciesFile| file.species)?,
        None => {
            warn!("No {SPECIES_FILE_STEM} file in '{}'; species lookups will use defaults", data_dir.display());
            SpeciesDatabase::new()
        }
    };
    let classifications = match find_table_file(data_dir, CLASSIFICATION_FILE_STEM) {
        Some(path) => load_table_file(&path, |file: ClassificationFile| file.classifications)?,
        None => {
            warn!("No {CLASSIFICATION_FILE_STEM} file in '{}'; lengths will not be classified", data_dir.display());
            ClassificationTable::new()
        }
    };

    info!(species = species.len(), "Reference tables loaded");
    Ok(ReferenceTables::new(species, classifications))
}

fn find_table_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

/// Reads a wrapper file `F` as JSON or YAML, chosen by extension, and pulls
/// the table out of it.
fn load_table_file<F, T, E>(path: &Path, extract: E) -> Result<T>
where
    F: DeserializeOwned,
    E: Fn(F) -> T,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: F = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {}", path.display()))?
    };
    Ok(extract(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIES_YAML: &str = r#"
schema_version: "1.0"
species:
  Holothuria scabra:
    linf: 38.5
    k: 0.41
    a: 0.27
    b: 2.31
    commonName: Sandfish
    description: Burrows in seagrass beds.
"#;

    const RULES_JSON: &str = r#"{
  "schema_version": "1.0",
  "classifications": {
    "default": [
      { "min": 0, "max": 15, "phase": "juvenile" },
      { "min": 15, "max": 100, "phase": "adult" }
    ]
  }
}"#;

    #[test]
    fn loads_yaml_and_json_tables() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("species_database.yaml"), SPECIES_YAML).unwrap();
        fs::write(dir.path().join("classification_rules.json"), RULES_JSON).unwrap();

        let tables = load_reference_tables(dir.path()).unwrap();
        assert_eq!(tables.species.get("Holothuria scabra").unwrap().common_name, "Sandfish");
        assert_eq!(tables.classifications.classify(16.0, None), Some("adult"));
    }

    #[test]
    fn bundled_data_directory_loads() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let tables = load_reference_tables(&data_dir).unwrap();
        assert_eq!(tables.species.get("Holothuria atra").unwrap().linf, 30.66);
        assert_eq!(tables.classifications.classify(20.0, Some("Holothuria scabra")), Some("sub-adult"));
        assert_eq!(tables.classifications.classify(20.0, Some("Holothuria atra")), Some("adult"));
    }

    #[test]
    fn missing_files_give_empty_tables() {
        let dir = tempfile::tempdir().unwrap();
        let tables = load_reference_tables(dir.path()).unwrap();
        assert!(tables.species.is_empty());
        assert!(tables.classifications.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("species_database.yml"), "species: [unclosed").unwrap();
        assert!(load_reference_tables(dir.path()).is_err());
    }
}
