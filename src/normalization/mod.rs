//! # FRA Data Normalization
//!
//! Turns a parsed sweep into the canonical form stored downstream:
//!
//! 1. Drop points with a NaN/Inf frequency, magnitude or (tracked) phase
//! 2. Stable sort by ascending frequency
//! 3. Remove duplicate frequencies, keeping the first after sorting
//! 4. Optionally resample onto a log-spaced grid
//! 5. Map the winding configuration onto [`WindingConfig`]
//!
//! Each step that changes the data appends a note to
//! [`NormalizedFraData::normalization_notes`]. Normalization never fails.
//!
//! ## Usage
//!
//! ```rust
//! use fra_ingest::model::RawFraData;
//! use fra_ingest::normalization::{normalize_fra_data, NormalizationOptions};
//!
//! let raw = RawFraData::new(vec![500.0, 100.0, 500.0], vec![-10.0, -5.0, -10.1]);
//! let normalized = normalize_fra_data(&raw, &NormalizationOptions::default());
//!
//! assert_eq!(normalized.frequency_hz, vec![100.0, 500.0]);
//! assert_eq!(normalized.magnitude_db, vec![-5.0, -10.0]);
//! assert_eq!(normalized.normalization_notes.len(), 2);
//! ```

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::model::{NormalizedFraData, RawFraData};
use crate::vocabulary::WindingConfig;

pub use timestamp::parse_measurement_timestamp;

mod resample;
mod timestamp;


/// Default grid size when resampling
pub const DEFAULT_TARGET_POINTS: usize = 800;

/// Normalization switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationOptions {
    /// Resample onto a log-spaced grid
    pub resample: bool,
    /// Grid size when resampling
    pub target_points: usize,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            resample: false,
            target_points: DEFAULT_TARGET_POINTS,
        }
    }
}

impl NormalizationOptions {
    /// Options that resample onto `target_points` log-spaced frequencies
    pub fn resampled(target_points: usize) -> Self {
        Self {
            resample: true,
            target_points,
        }
    }
}

/// One measured point
#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    frequency: f64,
    magnitude: f64,
    phase: Option<f64>,
}

impl Point {
    fn is_finite(&self) -> bool {
        self.frequency.is_finite()
            && self.magnitude.is_finite()
            && self.phase.map_or(true, f64::is_finite)
    }
}

/// Normalize one parsed sweep
pub fn normalize_fra_data(raw: &RawFraData, options: &NormalizationOptions) -> NormalizedFraData {
    let mut notes = Vec::new();

    let phase = match raw.phase_degrees.as_deref() {
        Some(p) if !p.is_empty() && p.len() != raw.frequency_hz.len() => {
            notes.push(format!(
                "Discarded phase data: {} value(s) for {} frequency point(s)",
                p.len(),
                raw.frequency_hz.len()
            ));
            None
        }
        Some(p) if !p.is_empty() => Some(p),
        _ => None,
    };

    if raw.frequency_hz.len() != raw.magnitude_db.len() {
        warn!(
            "normalizing unequal arrays ({} frequency, {} magnitude); extra values ignored",
            raw.frequency_hz.len(),
            raw.magnitude_db.len()
        );
    }

    let mut points: Vec<Point> = raw
        .frequency_hz
        .iter()
        .zip(&raw.magnitude_db)
        .enumerate()
        .map(|(i, (&frequency, &magnitude))| Point {
            frequency,
            magnitude,
            phase: phase.map(|p| p[i]),
        })
        .collect();

    let before = points.len();
    points.retain(Point::is_finite);
    let removed = before - points.len();
    if removed > 0 {
        notes.push(format!("Removed {removed} NaN/Inf value(s)"));
    }

    if !points.windows(2).all(|w| w[0].frequency <= w[1].frequency) {
        points.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        notes.push("Re-sorted data by ascending frequency".to_string());
    }

    let before = points.len();
    points.dedup_by(|later, earlier| later.frequency == earlier.frequency);
    let duplicates = before - points.len();
    if duplicates > 0 {
        notes.push(format!("Removed {duplicates} duplicate frequency point(s)"));
    }

    let mut frequency_hz: Vec<f64> = points.iter().map(|p| p.frequency).collect();
    let mut magnitude_db: Vec<f64> = points.iter().map(|p| p.magnitude).collect();
    let mut phase_degrees: Option<Vec<f64>> = (phase.is_some() && !points.is_empty())
        .then(|| points.iter().filter_map(|p| p.phase).collect());

    if options.resample && frequency_hz.len() > 2 {
        let f_min = frequency_hz[0].max(1.0);
        let f_max = frequency_hz[frequency_hz.len() - 1];
        match resample::log_grid(f_min, f_max, options.target_points) {
            Some(grid) => {
                magnitude_db = grid
                    .iter()
                    .map(|&f| resample::interpolate(&frequency_hz, &magnitude_db, f))
                    .collect();
                phase_degrees = phase_degrees.map(|ph| {
                    grid.iter()
                        .map(|&f| resample::interpolate(&frequency_hz, &ph, f))
                        .collect()
                });
                notes.push(format!(
                    "Resampled from {} to {} log-spaced points",
                    frequency_hz.len(),
                    grid.len()
                ));
                frequency_hz = grid;
            }
            None => debug!(
                "skipping resample: degenerate grid {f_min}..{f_max} Hz with {} points",
                options.target_points
            ),
        }
    }

    NormalizedFraData {
        frequency_hz,
        magnitude_db,
        phase_degrees,
        vendor: raw.vendor.clone(),
        winding_config: WindingConfig::from_label(raw.winding_config.as_deref()),
        measurement_date: raw.measurement_date.clone(),
        measurement_timestamp: raw
            .measurement_date
            .as_deref()
            .and_then(parse_measurement_timestamp),
        temperature_celsius: raw.temperature_celsius,
        serial_number: raw.serial_number.clone(),
        transformer_name: raw.transformer_name.clone(),
        notes: raw.notes.clone(),
        extra_metadata: raw.extra_metadata.clone(),
        normalization_notes: notes,
    }
}
