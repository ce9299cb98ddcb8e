//! # Winding Configuration Vocabulary
//!
//! Instruments label the terminal pair of a sweep however their operator typed
//! it ("HV-LV", "hv_lv", "H-L", "high-low", ...). Stored measurements use the
//! fixed set of labels in [`WindingConfig`] so sweeps can be compared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Controlled winding configuration labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindingConfig {
    /// High voltage to low voltage
    #[default]
    #[serde(rename = "HV-LV")]
    HvLv,
    /// High voltage to tertiary
    #[serde(rename = "HV-TV")]
    HvTv,
    /// Low voltage to tertiary
    #[serde(rename = "LV-TV")]
    LvTv,
    /// High voltage to ground
    #[serde(rename = "HV-GND")]
    HvGnd,
    /// Low voltage to ground
    #[serde(rename = "LV-GND")]
    LvGnd,
    /// Tertiary to ground
    #[serde(rename = "TV-GND")]
    TvGnd,
    /// High voltage, other end open
    #[serde(rename = "HV-Open")]
    HvOpen,
    /// Low voltage, other end open
    #[serde(rename = "LV-Open")]
    LvOpen,
    /// Anything that could not be mapped
    #[serde(rename = "Other")]
    Other,
}

impl WindingConfig {
    /// All labels in declaration order
    pub const ALL: [WindingConfig; 9] = [
        WindingConfig::HvLv,
        WindingConfig::HvTv,
        WindingConfig::LvTv,
        WindingConfig::HvGnd,
        WindingConfig::LvGnd,
        WindingConfig::TvGnd,
        WindingConfig::HvOpen,
        WindingConfig::LvOpen,
        WindingConfig::Other,
    ];

    /// Canonical label
    pub fn as_str(&self) -> &'static str {
        match self {
            WindingConfig::HvLv => "HV-LV",
            WindingConfig::HvTv => "HV-TV",
            WindingConfig::LvTv => "LV-TV",
            WindingConfig::HvGnd => "HV-GND",
            WindingConfig::LvGnd => "LV-GND",
            WindingConfig::TvGnd => "TV-GND",
            WindingConfig::HvOpen => "HV-Open",
            WindingConfig::LvOpen => "LV-Open",
            WindingConfig::Other => "Other",
        }
    }

    /// Map free text onto the vocabulary.
    ///
    /// Absent or blank input maps to `HV-LV`, the deployment default. Otherwise
    /// an exact case-insensitive label match wins, then the alias table, then
    /// `Other`.
    pub fn from_label(raw: Option<&str>) -> Self {
        let cleaned = match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_lowercase(),
            _ => return WindingConfig::default(),
        };

        if let Some(exact) = Self::ALL
            .iter()
            .find(|wc| wc.as_str().to_lowercase() == cleaned)
        {
            return *exact;
        }

        alias(&cleaned).unwrap_or(WindingConfig::Other)
    }
}

/// Alias table, keyed on the lowercased trimmed label
fn alias(cleaned: &str) -> Option<WindingConfig> {
    let config = match cleaned {
        "hv_lv" | "h-l" | "h_l" | "high-low" | "hv/lv" => WindingConfig::HvLv,
        "hv_tv" | "h-t" | "hv/tv" => WindingConfig::HvTv,
        "lv_tv" | "l-t" | "lv/tv" => WindingConfig::LvTv,
        "hv_gnd" | "hv-ground" | "hv_ground" => WindingConfig::HvGnd,
        "lv_gnd" | "lv-ground" | "lv_ground" => WindingConfig::LvGnd,
        "tv_gnd" | "tv-ground" | "tv_ground" => WindingConfig::TvGnd,
        "hv_open" | "hv-oc" => WindingConfig::HvOpen,
        "lv_open" | "lv-oc" => WindingConfig::LvOpen,
        _ => return None,
    };
    Some(config)
}

impl fmt::Display for WindingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
