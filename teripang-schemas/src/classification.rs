use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps a half-open length interval `[min, max)` to a life-stage phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub min: f64,
    pub max: f64,
    pub phase: String,
}

impl ClassificationRule {
    pub fn contains(&self, length: f64) -> bool {
        length >= self.min && length < self.max
    }
}

/// Ordered classification rules per species, with a `"default"` fallback entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationTable {
    rules: HashMap<String, Vec<ClassificationRule>>,
}

impl ClassificationTable {
    pub const DEFAULT_KEY: &'static str = "default";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, rules: Vec<ClassificationRule>) {
        self.rules.insert(key.into(), rules);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rule set for `species` if it has one, otherwise the default set.
    ///
    /// A species with its own entry never falls through to the default set,
    /// even when none of its rules match.
    pub fn rules_for(&self, species: Option<&str>) -> Option<&[ClassificationRule]> {
        species
            .and_then(|name| self.rules.get(name))
            .or_else(|| self.rules.get(Self::DEFAULT_KEY))
            .map(Vec::as_slice)
    }

    /// Returns the phase of the first rule whose interval contains `length`.
    pub fn classify(&self, length: f64, species: Option<&str>) -> Option<&str> {
        self.rules_for(species)?
            .iter()
            .find(|rule| rule.contains(length))
            .map(|rule| rule.phase.as_str())
    }
}

impl FromIterator<(String, Vec<ClassificationRule>)> for ClassificationTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<ClassificationRule>)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(min: f64, max: f64, phase: &str) -> ClassificationRule {
        ClassificationRule {
            min,
            max,
            phase: phase.to_string(),
        }
    }

    fn table() -> ClassificationTable {
        let mut table = ClassificationTable::new();
        table.insert(
            "default",
            vec![rule(0.0, 10.0, "juvenile"), rule(10.0, 20.0, "sub-adult"), rule(20.0, 100.0, "adult")],
        );
        table.insert("Holothuria scabra", vec![rule(0.0, 16.0, "juvenile"), rule(16.0, 22.0, "adult")]);
        table
    }

    #[test]
    fn intervals_are_half_open() {
        let table = table();
        assert_eq!(table.classify(9.99, None), Some("juvenile"));
        assert_eq!(table.classify(10.0, None), Some("sub-adult"));
        assert_eq!(table.classify(20.0, None), Some("adult"));
    }

    #[test]
    fn unknown_species_uses_default_rules() {
        let table = table();
        assert_eq!(table.classify(15.0, Some("Stichopus horrens")), Some("sub-adult"));
    }

    #[test]
    fn species_rules_do_not_fall_through_to_default() {
        let table = table();
        assert_eq!(table.classify(15.0, Some("Holothuria scabra")), Some("juvenile"));
        assert_eq!(table.classify(40.0, Some("Holothuria scabra")), None);
    }

    #[test]
    fn empty_table_classifies_nothing() {
        assert_eq!(ClassificationTable::new().classify(5.0, None), None);
    }

    #[test]
    fn deserializes_yaml_rules() {
        let yaml = "default:\n  - { min: 0, max: 12.5, phase: juvenile }\n  - { min: 12.5, max: 50, phase: adult }\n";
        let table: ClassificationTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.classify(12.5, None), Some("adult"));
    }
}
