use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ModelError;

/// Raw parsed FRA data before validation and normalization.
///
/// `frequency_hz` and `magnitude_db` always have the same length. Phase is
/// only appended for points where a phase value was read, so a phase array
/// shorter than `frequency_hz` cannot be aligned point-by-point and is
/// discarded downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFraData {
    /// Frequency samples in Hz
    pub frequency_hz: Vec<f64>,

    /// Magnitude samples in dB
    pub magnitude_db: Vec<f64>,

    /// Phase samples in degrees, when the file carried phase
    pub phase_degrees: Option<Vec<f64>>,

    /// Instrument vendor label (e.g. "Omicron", "Generic CSV")
    pub vendor: Option<String>,

    /// Winding configuration as written in the file
    pub winding_config: Option<String>,

    /// Measurement date as written in the file
    pub measurement_date: Option<String>,

    /// Oil/ambient temperature in degrees Celsius
    pub temperature_celsius: Option<f64>,

    /// Transformer serial number
    pub serial_number: Option<String>,

    /// Transformer or asset name
    pub transformer_name: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,

    /// Every recognized metadata key/value pair from the file
    pub extra_metadata: BTreeMap<String, String>,
}

impl RawFraData {
    /// Create raw data from frequency/magnitude arrays
    pub fn new(frequency_hz: Vec<f64>, magnitude_db: Vec<f64>) -> Self {
        Self {
            frequency_hz,
            magnitude_db,
            ..Default::default()
        }
    }

    /// Attach a phase array
    pub fn with_phase(mut self, phase_degrees: Vec<f64>) -> Self {
        self.phase_degrees = Some(phase_degrees);
        self
    }

    /// Number of frequency points
    pub fn len(&self) -> usize {
        self.frequency_hz.len()
    }

    /// True when no points were parsed
    pub fn is_empty(&self) -> bool {
        self.frequency_hz.is_empty()
    }

    /// Phase array, but only when it lines up with the frequency array
    pub fn aligned_phase(&self) -> Option<&[f64]> {
        self.phase_degrees
            .as_deref()
            .filter(|phase| !phase.is_empty() && phase.len() == self.frequency_hz.len())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}
