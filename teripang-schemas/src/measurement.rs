use serde::{Deserialize, Serialize};

/// A single specimen measurement. Lengths are in centimetres, weights in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub length: f64,
    /// Absent in age mode, where only lengths are recorded.
    pub weight: Option<f64>,
}

impl Measurement {
    pub fn length_only(length: f64) -> Self {
        Self {
            length,
            weight: None,
        }
    }

    pub fn with_weight(length: f64, weight: f64) -> Self {
        Self {
            length,
            weight: Some(weight),
        }
    }

    /// Returns the weight when both length and weight are strictly positive.
    pub fn positive_weight(&self) -> Option<f64> {
        self.weight.filter(|w| *w > 0.0 && self.length > 0.0)
    }
}

/// A measurement tagged with the species it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesMeasurement {
    pub species: String,
    pub length: f64,
    pub weight: f64,
}

impl SpeciesMeasurement {
    pub fn measurement(&self) -> Measurement {
        Measurement::with_weight(self.length, self.weight)
    }
}
