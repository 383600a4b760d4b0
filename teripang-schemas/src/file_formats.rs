use crate::{classification::ClassificationTable, species::SpeciesDatabase};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SpeciesFile {
    pub schema_version: String,
    pub species: SpeciesDatabase,
}

#[derive(Debug, Deserialize)]
pub struct ClassificationFile {
    pub schema_version: String,
    pub classifications: ClassificationTable,
}
