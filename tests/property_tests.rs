//! Property tests for normalization and the import pipeline

use fra_ingest::model::RawFraData;
use fra_ingest::normalization::{normalize_fra_data, NormalizationOptions};
use fra_ingest::parsers::{FraParser, GenericCsvParser, VendorTextParser};
use fra_ingest::pipeline::ImportPipeline;
use fra_ingest::validation::{validate_fra_data, ValidationConfig};
use proptest::prelude::*;

/// Frequencies with duplicates, disorder and the odd non-finite value
fn messy_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => (1u32..5000).prop_map(|v| v as f64),
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
    ]
}

fn messy_sweep() -> impl Strategy<Value = RawFraData> {
    (1usize..60).prop_flat_map(|n| {
        (
            prop::collection::vec(messy_value(), n),
            prop::collection::vec(-100.0f64..20.0, n),
            prop::option::of(prop::collection::vec(-180.0f64..180.0, n)),
        )
            .prop_map(|(freq, mag, phase)| {
                let mut data = RawFraData::new(freq, mag);
                data.phase_degrees = phase;
                data
            })
    })
}

/// Phase cell as written in an export: a number, blank, or junk
fn phase_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => (-180.0f64..180.0).prop_map(|p| format!("{p:.2}")),
        2 => Just(String::new()),
        1 => Just("n/a".to_string()),
        1 => Just("--".to_string()),
    ]
}

/// Text rows of frequency, magnitude and an optional phase cell
fn text_rows() -> impl Strategy<Value = Vec<(u32, f64, Option<String>)>> {
    prop::collection::vec(
        (1u32..1_000_000, -90.0f64..10.0, prop::option::of(phase_cell())),
        0..50,
    )
}

proptest! {
    /// Parsed series stay aligned whatever the phase column holds
    #[test]
    fn test_parsed_series_lengths(rows in text_rows(), sep in "[,;\t]") {
        let mut generic = String::from("Frequency,Magnitude,Phase\n").replace(',', &sep);
        let mut omicron = String::from("Omicron FRAnalyzer\nSerial: T-1\n");
        for (f, m, p) in &rows {
            let line = match p {
                Some(p) => format!("{f}{sep}{m:.3}{sep}{p}\n"),
                None => format!("{f}{sep}{m:.3}\n"),
            };
            generic.push_str(&line);
            omicron.push_str(&line);
        }

        let generic = GenericCsvParser::new().parse("sweep.csv", generic.as_bytes());
        let omicron = VendorTextParser::omicron().parse("sweep.csv", omicron.as_bytes());
        for result in [generic, omicron] {
            if let Some(data) = &result.data {
                prop_assert_eq!(data.frequency_hz.len(), data.magnitude_db.len());
                if let Some(phase) = &data.phase_degrees {
                    prop_assert!(phase.len() <= data.frequency_hz.len());
                }
            }
        }
    }


    /// Normalized frequencies are finite and strictly ascending, arrays aligned
    #[test]
    fn test_normalized_postconditions(raw in messy_sweep()) {
        let normalized = normalize_fra_data(&raw, &NormalizationOptions::default());

        prop_assert_eq!(normalized.frequency_hz.len(), normalized.magnitude_db.len());
        prop_assert!(normalized.frequency_hz.iter().all(|f| f.is_finite()));
        prop_assert!(normalized.magnitude_db.iter().all(|m| m.is_finite()));
        prop_assert!(normalized.frequency_hz.windows(2).all(|w| w[0] < w[1]));
        if let Some(phase) = &normalized.phase_degrees {
            prop_assert_eq!(phase.len(), normalized.frequency_hz.len());
        }
        prop_assert!(normalized.len() <= raw.len());
    }

    /// A second pass over normalized data changes nothing
    #[test]
    fn test_normalization_idempotent(raw in messy_sweep()) {
        let options = NormalizationOptions::default();
        let once = normalize_fra_data(&raw, &options);
        let twice = normalize_fra_data(&RawFraData::from(once.clone()), &options);

        prop_assert!(twice.normalization_notes.is_empty());
        prop_assert_eq!(&twice.frequency_hz, &once.frequency_hz);
        prop_assert_eq!(&twice.magnitude_db, &once.magnitude_db);
        prop_assert_eq!(&twice.phase_degrees, &once.phase_degrees);
    }

    /// Resampling yields exactly the requested grid size
    #[test]
    fn test_resample_length(raw in messy_sweep(), target in 2usize..300) {
        let normalized = normalize_fra_data(&raw, &NormalizationOptions::resampled(target));
        let resampled = normalized
            .normalization_notes
            .iter()
            .any(|note| note.starts_with("Resampled"));
        if resampled {
            prop_assert_eq!(normalized.len(), target);
            prop_assert!(normalized.frequency_hz.windows(2).all(|w| w[0] < w[1]));
        }
    }

    /// Arrays of different lengths are always rejected
    #[test]
    fn test_length_mismatch_is_invalid(
        freq in prop::collection::vec(1.0f64..1e6, 0..40),
        mag in prop::collection::vec(-80.0f64..0.0, 0..40),
    ) {
        prop_assume!(freq.len() != mag.len());
        let result = validate_fra_data(&freq, &mag, None, &ValidationConfig::default());
        prop_assert!(!result.is_valid());
        prop_assert!(!result.errors().is_empty());
    }

    /// The same bytes always produce the same outcome
    #[test]
    fn test_pipeline_deterministic(
        rows in prop::collection::vec((1u32..100_000, -90.0f64..10.0), 0..40),
        header in any::<bool>(),
    ) {
        let mut csv = String::new();
        if header {
            csv.push_str("Frequency,Magnitude\n");
        }
        for (f, m) in &rows {
            csv.push_str(&format!("{f},{m:.3}\n"));
        }

        let pipeline = ImportPipeline::default();
        let first = pipeline.run("sweep.csv", csv.as_bytes());
        let second = pipeline.run("sweep.csv", csv.as_bytes());
        prop_assert_eq!(first.summary(), second.summary());
        prop_assert_eq!(first.data(), second.data());
    }

    /// Arbitrary bytes never panic the pipeline
    #[test]
    fn test_pipeline_total(bytes in prop::collection::vec(any::<u8>(), 0..512), ext in "(csv|txt|xml|frax|fra)") {
        let filename = format!("input.{ext}");
        let summary = ImportPipeline::default().run(&filename, &bytes).summary();
        prop_assert_eq!(summary.original_filename, filename);
    }
}
