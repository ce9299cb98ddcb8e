use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ModelError, RawFraData};
use crate::vocabulary::WindingConfig;

/// FRA data after normalization, ready to be handed to storage.
///
/// Invariants:
/// - `frequency_hz` is strictly ascending with no duplicates.
/// - No NaN/Inf in any array.
/// - `magnitude_db` (and `phase_degrees`, when present) match `frequency_hz` in length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFraData {
    /// Frequency samples in Hz
    pub frequency_hz: Vec<f64>,

    /// Magnitude samples in dB
    pub magnitude_db: Vec<f64>,

    /// Phase samples in degrees
    pub phase_degrees: Option<Vec<f64>>,

    /// Instrument vendor label
    pub vendor: Option<String>,

    /// Controlled winding configuration
    pub winding_config: WindingConfig,

    /// Measurement date as written in the file
    pub measurement_date: Option<String>,

    /// Measurement date, when it could be interpreted
    pub measurement_timestamp: Option<NaiveDateTime>,

    /// Temperature in degrees Celsius
    pub temperature_celsius: Option<f64>,

    /// Transformer serial number
    pub serial_number: Option<String>,

    /// Transformer or asset name
    pub transformer_name: Option<String>,

    /// Free-form notes
    pub notes: Option<String>,

    /// Every recognized metadata key/value pair from the file
    pub extra_metadata: BTreeMap<String, String>,

    /// Structural changes applied during normalization
    pub normalization_notes: Vec<String>,
}

impl NormalizedFraData {
    /// Number of points
    pub fn len(&self) -> usize {
        self.frequency_hz.len()
    }

    /// True when no points remain
    pub fn is_empty(&self) -> bool {
        self.frequency_hz.is_empty()
    }

    /// Lowest and highest frequency
    pub fn frequency_bounds(&self) -> Option<(f64, f64)> {
        Some((*self.frequency_hz.first()?, *self.frequency_hz.last()?))
    }

    /// Frequency range formatted for audit records, e.g. `"20.0 Hz - 2000000.0 Hz"`
    pub fn frequency_range(&self) -> Option<String> {
        self.frequency_bounds()
            .map(|(min, max)| format!("{min:.1} Hz - {max:.1} Hz"))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<NormalizedFraData> for RawFraData {
    fn from(normalized: NormalizedFraData) -> Self {
        RawFraData {
            frequency_hz: normalized.frequency_hz,
            magnitude_db: normalized.magnitude_db,
            phase_degrees: normalized.phase_degrees,
            vendor: normalized.vendor,
            winding_config: Some(normalized.winding_config.as_str().to_string()),
            measurement_date: normalized.measurement_date,
            temperature_celsius: normalized.temperature_celsius,
            serial_number: normalized.serial_number,
            transformer_name: normalized.transformer_name,
            notes: normalized.notes,
            extra_metadata: normalized.extra_metadata,
        }
    }
}
