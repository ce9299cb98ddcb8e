//! # FRA Data Validation
//!
//! Checks a parsed sweep against physical and statistical expectations before
//! it is normalized. Structural problems (empty or mismatched arrays, too few
//! points) are errors and stop the checks; everything else is a warning that
//! is forwarded to the caller but never blocks the import.
//!
//! ## Rules, in order
//!
//! 1. Empty frequency or magnitude array (error, stop)
//! 2. Frequency/magnitude length mismatch (error, stop)
//! 3. Phase length differs from frequency (warning; phase is dropped later)
//! 4. Fewer than [`MIN_DATA_POINTS`] points (error, stop)
//! 5. NaN/Inf counts per array (warning)
//! 6. Fewer than [`MIN_DATA_POINTS`] finite points (error, stop)
//! 7. Frequency outside the configured instrument range (warning)
//! 8. Frequencies not strictly ascending (warning)
//! 9. Duplicate frequencies (warning)
//! 10. Magnitude outside [`MAG_LOWER_BOUND_DB`]..[`MAG_UPPER_BOUND_DB`] (warning)
//! 11. Magnitude outliers by z-score (warning)
//!
//! Rules 5-11 look only at points where both frequency and magnitude are finite.
//!
//! ## Usage
//!
//! ```rust
//! use fra_ingest::validation::{validate_fra_data, ValidationConfig};
//!
//! let freq: Vec<f64> = (1..=20).map(|i| i as f64 * 100.0).collect();
//! let mag = vec![-10.0; 20];
//!
//! let result = validate_fra_data(&freq, &mag, None, &ValidationConfig::default());
//! assert!(result.is_valid());
//! assert_eq!(result.stats().valid_points, 20);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};

pub use result::{ValidationResult, ValidationStats};

mod result;

#[cfg(test)]
mod tests;

/// Minimum number of points for a usable sweep
pub const MIN_DATA_POINTS: usize = 10;

/// Lowest plausible magnitude
pub const MAG_LOWER_BOUND_DB: f64 = -120.0;

/// Highest plausible magnitude
pub const MAG_UPPER_BOUND_DB: f64 = 40.0;

/// Magnitudes further than this many standard deviations from the mean are outliers
pub const OUTLIER_Z_THRESHOLD: f64 = 4.0;

/// Default lower bound of the expected instrument range
pub const DEFAULT_MIN_FREQUENCY_HZ: f64 = 20.0;

/// Default upper bound of the expected instrument range
pub const DEFAULT_MAX_FREQUENCY_HZ: f64 = 2_000_000.0;

/// Expected instrument frequency range.
///
/// These bounds only produce warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Lower bound in Hz
    pub min_frequency_hz: f64,
    /// Upper bound in Hz
    pub max_frequency_hz: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_frequency_hz: DEFAULT_MIN_FREQUENCY_HZ,
            max_frequency_hz: DEFAULT_MAX_FREQUENCY_HZ,
        }
    }
}

/// Validate one sweep
pub fn validate_fra_data(
    frequency_hz: &[f64],
    magnitude_db: &[f64],
    phase_degrees: Option<&[f64]>,
    config: &ValidationConfig,
) -> ValidationResult {
    let phase = phase_degrees.filter(|p| !p.is_empty());
    let (freq, mag): (Vec<f64>, Vec<f64>) = frequency_hz
        .iter()
        .zip(magnitude_db)
        .filter(|(f, m)| f.is_finite() && m.is_finite())
        .map(|(f, m)| (*f, *m))
        .unzip();

    let mut result = ValidationResult::new(ValidationStats {
        total_points: frequency_hz.len(),
        valid_points: freq.len(),
        frequency_min_hz: min_value(&freq),
        frequency_max_hz: max_value(&freq),
        magnitude_min_db: min_value(&mag),
        magnitude_max_db: max_value(&mag),
        has_phase: phase.is_some(),
    });

    check_structure(&mut result, frequency_hz, magnitude_db, phase);
    if !result.is_valid() {
        return result;
    }

    check_non_finite(&mut result, frequency_hz, magnitude_db);
    if freq.len() < MIN_DATA_POINTS {
        result.add_error(format!(
            "Only {} valid (finite) data points after filtering",
            freq.len()
        ));
        return result;
    }

    check_frequency(&mut result, &freq, config);
    check_magnitude(&mut result, &mag);

    debug!(
        "validated {} points: {} warning(s)",
        result.stats().total_points,
        result.warnings().len()
    );
    result
}

/// Rules 1-4
fn check_structure(
    result: &mut ValidationResult,
    frequency_hz: &[f64],
    magnitude_db: &[f64],
    phase: Option<&[f64]>,
) {
    if frequency_hz.is_empty() || magnitude_db.is_empty() {
        result.add_error("Frequency or magnitude array is empty");
        return;
    }

    if frequency_hz.len() != magnitude_db.len() {
        result.add_error(format!(
            "Array length mismatch: frequency has {} values, magnitude has {} values",
            frequency_hz.len(),
            magnitude_db.len()
        ));
        return;
    }

    if let Some(phase) = phase.filter(|p| p.len() != frequency_hz.len()) {
        result.add_warning(format!(
            "Phase array length ({}) differs from frequency ({}); phase data will be discarded",
            phase.len(),
            frequency_hz.len()
        ));
    }

    if frequency_hz.len() < MIN_DATA_POINTS {
        result.add_error(format!(
            "Too few data points ({}); minimum is {MIN_DATA_POINTS}",
            frequency_hz.len()
        ));
    }
}

/// Rule 5
fn check_non_finite(result: &mut ValidationResult, frequency_hz: &[f64], magnitude_db: &[f64]) {
    for (label, values) in [("Frequency", frequency_hz), ("Magnitude", magnitude_db)] {
        let nan = values.iter().filter(|v| v.is_nan()).count();
        let inf = values.iter().filter(|v| v.is_infinite()).count();
        if nan > 0 || inf > 0 {
            result.add_warning(format!("{label} array has {nan} NaN and {inf} Inf values"));
        }
    }
}

/// Rules 7-9, over finite values
fn check_frequency(result: &mut ValidationResult, freq: &[f64], config: &ValidationConfig) {
    if let Some(f_min) = min_value(freq).filter(|&f| f < config.min_frequency_hz) {
        result.add_warning(format!(
            "Minimum frequency ({f_min:.1} Hz) is below expected lower bound ({:.1} Hz)",
            config.min_frequency_hz
        ));
    }
    if let Some(f_max) = max_value(freq).filter(|&f| f > config.max_frequency_hz) {
        result.add_warning(format!(
            "Maximum frequency ({f_max:.1} Hz) exceeds expected upper bound ({:.1} Hz)",
            config.max_frequency_hz
        ));
    }

    if !freq.windows(2).all(|w| w[0] < w[1]) {
        result.add_warning("Frequency values are not strictly ascending");
    }

    let mut sorted = freq.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    let duplicates = freq.len() - sorted.len();
    if duplicates > 0 {
        result.add_warning(format!("{duplicates} duplicate frequency value(s) detected"));
    }
}

/// Rules 10-11, over finite values
fn check_magnitude(result: &mut ValidationResult, mag: &[f64]) {
    if let Some(m_min) = min_value(mag).filter(|&m| m < MAG_LOWER_BOUND_DB) {
        result.add_warning(format!(
            "Magnitude minimum ({m_min:.1} dB) is below expected lower bound ({MAG_LOWER_BOUND_DB:.1} dB)"
        ));
    }
    if let Some(m_max) = max_value(mag).filter(|&m| m > MAG_UPPER_BOUND_DB) {
        result.add_warning(format!(
            "Magnitude maximum ({m_max:.1} dB) exceeds expected upper bound ({MAG_UPPER_BOUND_DB:.1} dB)"
        ));
    }

    let outliers = count_outliers(mag);
    if outliers > 0 {
        result.add_warning(format!(
            "{outliers} potential outlier(s) in magnitude (z-score > {OUTLIER_Z_THRESHOLD:.1})"
        ));
    }
}

/// Points with |z| above [`OUTLIER_Z_THRESHOLD`], using the population
/// standard deviation; zero for 3 or fewer points or a flat series
pub(crate) fn count_outliers(values: &[f64]) -> usize {
    if values.len() <= 3 {
        return 0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    if std_dev <= 0.0 || !std_dev.is_finite() {
        return 0;
    }

    values
        .iter()
        .filter(|v| ((*v - mean) / std_dev).abs() > OUTLIER_Z_THRESHOLD)
        .count()
}

fn min_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

fn max_value(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
