use super::*;

/// Log-spaced with exact endpoints
fn log_sweep(n: usize, f_min: f64, f_max: f64) -> Vec<f64> {
    let (lo, hi) = (f_min.log10(), f_max.log10());
    let mut freq: Vec<f64> = (0..n)
        .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / (n - 1) as f64))
        .collect();
    freq[0] = f_min;
    freq[n - 1] = f_max;
    freq
}

/// Evenly spaced with exact endpoints
fn linear(n: usize, start: f64, end: f64) -> Vec<f64> {
    let mut values: Vec<f64> = (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect();
    values[n - 1] = end;
    values
}

fn validate(freq: &[f64], mag: &[f64]) -> ValidationResult {
    validate_fra_data(freq, mag, None, &ValidationConfig::default())
}

#[test]
fn test_clean_sweep() {
    let freq = log_sweep(1000, 20.0, 2_000_000.0);
    let mag = linear(1000, -2.1, -40.3);
    let phase = linear(1000, 5.0, -170.2);

    let result = validate_fra_data(&freq, &mag, Some(phase.as_slice()), &ValidationConfig::default());

    assert!(result.is_valid());
    assert!(result.errors().is_empty());
    assert!(result.warnings().is_empty(), "{:?}", result.warnings());
    assert_eq!(result.stats().total_points, 1000);
    assert_eq!(result.stats().valid_points, 1000);
    assert_eq!(result.stats().magnitude_min_db, Some(-40.3));
    assert!(result.stats().has_phase);
}

#[test]
fn test_empty_arrays() {
    let result = validate(&[], &[]);
    assert!(!result.is_valid());
    assert_eq!(result.errors(), vec!["Frequency or magnitude array is empty"]);
    assert_eq!(result.stats().total_points, 0);
    assert_eq!(result.stats().frequency_min_hz, None);
}

#[test]
fn test_length_mismatch_stops() {
    let freq = linear(12, 100.0, 1200.0);
    let mag = vec![-1.0; 11];
    let result = validate(&freq, &mag);

    assert!(!result.is_valid());
    assert_eq!(
        result.errors(),
        vec!["Array length mismatch: frequency has 12 values, magnitude has 11 values"]
    );
    assert!(result.warnings().is_empty());
}

#[test]
fn test_phase_mismatch_is_warning() {
    let freq = linear(12, 100.0, 1200.0);
    let mag = vec![-1.0; 12];
    let phase = vec![0.0; 7];
    let result = validate_fra_data(&freq, &mag, Some(phase.as_slice()), &ValidationConfig::default());

    assert!(result.is_valid());
    assert_eq!(
        result.warnings(),
        vec!["Phase array length (7) differs from frequency (12); phase data will be discarded"]
    );
}

#[test]
fn test_empty_phase_counts_as_absent() {
    let freq = linear(12, 100.0, 1200.0);
    let mag = vec![-1.0; 12];
    let result = validate_fra_data(&freq, &mag, Some(&[] as &[f64]), &ValidationConfig::default());

    assert!(result.warnings().is_empty());
    assert!(!result.stats().has_phase);
}

#[test]
fn test_too_few_points() {
    let freq = linear(5, 100.0, 500.0);
    let mag = vec![-3.0; 5];
    let result = validate(&freq, &mag);

    assert!(!result.is_valid());
    assert_eq!(result.errors(), vec!["Too few data points (5); minimum is 10"]);
    // Stats are still filled in for diagnostics
    assert_eq!(result.stats().total_points, 5);
    assert_eq!(result.stats().frequency_max_hz, Some(500.0));
}

#[test]
fn test_non_finite_values() {
    let mut freq = linear(12, 100.0, 1200.0);
    let mut mag = vec![-1.0; 12];
    freq[0] = f64::NAN;
    freq[1] = f64::NAN;
    mag[5] = f64::INFINITY;

    let result = validate(&freq, &mag);

    assert!(!result.is_valid());
    assert_eq!(
        result.warnings(),
        vec![
            "Frequency array has 2 NaN and 0 Inf values",
            "Magnitude array has 0 NaN and 1 Inf values",
        ]
    );
    assert_eq!(
        result.errors(),
        vec!["Only 9 valid (finite) data points after filtering"]
    );
    assert_eq!(result.stats().valid_points, 9);
}

#[test]
fn test_frequency_range_warnings() {
    let freq = log_sweep(50, 10.0, 3_000_000.0);
    let mag = vec![-20.0; 50];
    let result = validate(&freq, &mag);

    assert!(result.is_valid());
    assert_eq!(
        result.warnings(),
        vec![
            "Minimum frequency (10.0 Hz) is below expected lower bound (20.0 Hz)",
            "Maximum frequency (3000000.0 Hz) exceeds expected upper bound (2000000.0 Hz)",
        ]
    );
}

#[test]
fn test_configured_range() {
    let freq = log_sweep(50, 10.0, 3_000_000.0);
    let mag = vec![-20.0; 50];
    let config = ValidationConfig {
        min_frequency_hz: 1.0,
        max_frequency_hz: 10_000_000.0,
    };
    let result = validate_fra_data(&freq, &mag, None, &config);
    assert!(result.warnings().is_empty());
}

#[test]
fn test_ordering_and_duplicates() {
    let mut freq = linear(12, 100.0, 1200.0);
    freq.swap(3, 4);
    freq[10] = freq[9];
    let mag = vec![-5.0; 12];

    let result = validate(&freq, &mag);

    assert!(result.is_valid());
    assert_eq!(
        result.warnings(),
        vec![
            "Frequency values are not strictly ascending",
            "1 duplicate frequency value(s) detected",
        ]
    );
}

#[test]
fn test_magnitude_bounds() {
    let freq = linear(12, 100.0, 1200.0);
    let mut mag = linear(12, -100.0, 0.0);
    mag[0] = -130.0;
    mag[11] = 45.0;

    let result = validate(&freq, &mag);

    assert!(result
        .warnings()
        .contains(&"Magnitude minimum (-130.0 dB) is below expected lower bound (-120.0 dB)".to_string()));
    assert!(result
        .warnings()
        .contains(&"Magnitude maximum (45.0 dB) exceeds expected upper bound (40.0 dB)".to_string()));
}

#[test]
fn test_outlier_detection() {
    let freq = linear(20, 100.0, 2000.0);
    let mut mag = vec![-50.0; 20];
    mag[7] = 0.0;

    let result = validate(&freq, &mag);

    assert!(result.is_valid());
    assert_eq!(
        result.warnings(),
        vec!["1 potential outlier(s) in magnitude (z-score > 4.0)"]
    );
}

#[test]
fn test_count_outliers_edge_cases() {
    assert_eq!(count_outliers(&[0.0, 0.0, 100.0]), 0);
    assert_eq!(count_outliers(&[-3.0; 30]), 0);
    assert_eq!(count_outliers(&[]), 0);
}

#[test]
fn test_errors_flip_validity() {
    let mut result = ValidationResult::default();
    assert!(result.is_valid());
    result.add_warning("just a warning");
    assert!(result.is_valid());
    result.add_error("fatal");
    assert!(!result.is_valid());

    // nothing recorded afterwards restores validity
    result.add_warning("late warning");
    assert!(!result.is_valid());
    assert_eq!(result.errors(), ["fatal"]);
    assert_eq!(result.warnings(), ["just a warning", "late warning"]);
}

#[test]
fn test_report_rendering() {
    let freq = linear(5, 100.0, 500.0);
    let failed = validate(&freq, &[-3.0; 5]);
    let text = failed.to_string();
    assert!(text.starts_with("FRA Validation Report"));
    assert!(text.contains("ERROR: Too few data points (5); minimum is 10"));
    assert!(text.contains("Frequency: 100.0 Hz - 500.0 Hz"));
    assert!(text.contains("Validation FAILED"));

    let freq = linear(12, 10.0, 1200.0);
    let warned = validate(&freq, &[-3.0; 12]);
    assert!(warned.to_string().contains("Validation PASSED with warnings"));
    assert!(warned.format_colored().contains("FRA Validation Report"));
}

#[test]
fn test_result_serializes() {
    let freq = linear(12, 100.0, 1200.0);
    let json = validate(&freq, &[-1.0; 12]).to_json().unwrap();
    let back: ValidationResult = serde_json::from_str(&json).unwrap();
    assert!(back.is_valid());
    assert_eq!(back.stats().total_points, 12);
}
