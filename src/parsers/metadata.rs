//! Mapping of free-form metadata keys onto [`RawFraData`] fields.
//!
//! Vendors name the same thing differently ("Serial No.", "Transformer S/N",
//! "serialNumber"), so keys are classified by case-insensitive substring
//! rather than by exact name.

use serde::{Deserialize, Serialize};

use crate::model::RawFraData;

/// Semantic category of a metadata key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    /// Transformer serial number
    SerialNumber,
    /// Measurement date/time (kept as free text)
    MeasurementDate,
    /// Winding configuration (kept as free text)
    WindingConfig,
    /// Temperature in degrees Celsius
    Temperature,
    /// Transformer or asset name
    TransformerName,
    /// Operator notes
    Notes,
}

impl MetadataField {
    /// Classify a metadata key, checking categories in a fixed order
    pub fn classify(key: &str) -> Option<Self> {
        let k = key.trim().to_lowercase();

        if k.contains("serial") || k == "sn" || k == "s/n" {
            Some(MetadataField::SerialNumber)
        } else if k.contains("date") || k.contains("time") || k.contains("measured") {
            Some(MetadataField::MeasurementDate)
        } else if k.contains("winding") || k.contains("config") {
            Some(MetadataField::WindingConfig)
        } else if k.contains("temp") {
            Some(MetadataField::Temperature)
        } else if k.contains("transformer") || k.contains("asset") || k.contains("name") {
            Some(MetadataField::TransformerName)
        } else if k.contains("note") || k.contains("comment") {
            Some(MetadataField::Notes)
        } else {
            None
        }
    }
}

/// Parse a temperature by discarding everything except digits, `.` and `-`.
///
/// `"25 °C"` gives `25.0`; strings with several numbers (`"20-25"`) or no
/// digits give `None`.
pub fn parse_temperature(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().ok()
}

/// Record metadata pairs (in file order) onto `data`.
///
/// Every pair lands in `extra_metadata`; recognized keys also fill the named
/// field. The first match per field wins.
pub(crate) fn apply_metadata<'a, I>(data: &mut RawFraData, pairs: I)
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    for (key, value) in pairs {
        data.extra_metadata
            .entry(key.clone())
            .or_insert_with(|| value.clone());

        if let Some(field) = MetadataField::classify(key) {
            fill_field(data, field, value);
        }
    }
}

/// Set one semantic field unless an earlier value already filled it
pub(crate) fn fill_field(data: &mut RawFraData, field: MetadataField, value: &str) {
    let slot = match field {
        MetadataField::SerialNumber => &mut data.serial_number,
        MetadataField::MeasurementDate => &mut data.measurement_date,
        MetadataField::WindingConfig => &mut data.winding_config,
        MetadataField::TransformerName => &mut data.transformer_name,
        MetadataField::Notes => &mut data.notes,
        MetadataField::Temperature => {
            if data.temperature_celsius.is_none() {
                data.temperature_celsius = parse_temperature(value);
            }
            return;
        }
    };

    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_substring() {
        assert_eq!(MetadataField::classify("Serial Number"), Some(MetadataField::SerialNumber));
        assert_eq!(MetadataField::classify("Test Date"), Some(MetadataField::MeasurementDate));
        assert_eq!(MetadataField::classify("Time"), Some(MetadataField::MeasurementDate));
        assert_eq!(MetadataField::classify("Measured on"), Some(MetadataField::MeasurementDate));
        assert_eq!(MetadataField::classify("Winding"), Some(MetadataField::WindingConfig));
        assert_eq!(MetadataField::classify("Test Config"), Some(MetadataField::WindingConfig));
        assert_eq!(MetadataField::classify("Oil Temp"), Some(MetadataField::Temperature));
        assert_eq!(MetadataField::classify("Transformer"), Some(MetadataField::TransformerName));
        assert_eq!(MetadataField::classify("Unit Name"), Some(MetadataField::TransformerName));
        assert_eq!(MetadataField::classify("Asset ID"), Some(MetadataField::TransformerName));
        assert_eq!(MetadataField::classify("Comment"), Some(MetadataField::Notes));
        assert_eq!(MetadataField::classify("Operator"), None);
    }

    #[test]
    fn test_parse_temperature() {
        assert_eq!(parse_temperature("25 °C"), Some(25.0));
        assert_eq!(parse_temperature("-5.5C"), Some(-5.5));
        assert_eq!(parse_temperature("+31"), Some(31.0));
        assert_eq!(parse_temperature("ambient"), None);
        assert_eq!(parse_temperature("-"), None);
        assert_eq!(parse_temperature("20-25"), None);
    }

    #[test]
    fn test_apply_first_match_wins() {
        let pairs = vec![
            ("Serial".to_string(), "SN-1".to_string()),
            ("Serial No".to_string(), "SN-2".to_string()),
            ("Temperature".to_string(), "unknown".to_string()),
            ("Oil Temp".to_string(), "28.5 C".to_string()),
            ("Operator".to_string(), "JD".to_string()),
        ];

        let mut data = RawFraData::default();
        apply_metadata(&mut data, &pairs);

        assert_eq!(data.serial_number.as_deref(), Some("SN-1"));
        assert_eq!(data.temperature_celsius, Some(28.5));
        assert_eq!(data.extra_metadata.len(), 5);
        assert_eq!(data.extra_metadata.get("Operator").map(String::as_str), Some("JD"));
    }
}
