//! # Import Pipeline
//!
//! Runs one file through detection, parsing, validation and normalization:
//!
//! ```text
//! bytes -> size check -> ParserRegistry::detect_parser -> FraParser::parse
//!       -> validate_fra_data -> normalize_fra_data -> NormalizedFraData
//! ```
//!
//! Every exit is an [`ImportOutcome`] value, never an `Err`. The caller persists
//! the [`ImportSummary`] audit record and, on success, the normalized data.
//!
//! The pipeline holds no mutable state, so one instance can serve many threads.
//!
//! ## Usage
//!
//! ```rust
//! use fra_ingest::pipeline::{ImportOutcome, ImportPipeline, ImportStatus};
//!
//! let mut csv = String::from("Frequency,Magnitude\n");
//! for i in 1..=20 {
//!     csv.push_str(&format!("{},{}\n", i * 100, -(i as f64)));
//! }
//!
//! let pipeline = ImportPipeline::default();
//! let outcome = pipeline.run("sweep.csv", csv.as_bytes());
//!
//! let summary = outcome.summary();
//! assert_eq!(summary.status, ImportStatus::Success);
//! assert_eq!(summary.data_points, Some(20));
//! assert_eq!(summary.frequency_range.as_deref(), Some("100.0 Hz - 2000.0 Hz"));
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PipelineConfig;
use crate::model::{NormalizedFraData, ParseResult, ParseStatus, RawFraData};
use crate::normalization::normalize_fra_data;
use crate::parsers::FraParser;
use crate::registry::ParserRegistry;
use crate::validation::{validate_fra_data, ValidationResult};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Final status of an import, as stored in the audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    /// Normalized data produced from a fully parsed file
    Success,
    /// Normalized data produced, but some rows were skipped while parsing
    Partial,
    /// No data produced
    Failed,
}

impl ImportStatus {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Success => "success",
            ImportStatus::Partial => "partial",
            ImportStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything produced by a successful import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Name of the uploaded file
    pub filename: String,
    /// Size of the uploaded file
    pub size_bytes: u64,
    /// Name of the parser that claimed the file
    pub parser: String,
    /// Parse status (success or partial)
    pub parse_status: ParseStatus,
    /// Format tag reported by the parser
    pub detected_format: Option<String>,
    /// Warnings raised while parsing
    pub parse_warnings: Vec<String>,
    /// Validation outcome (valid, possibly with warnings)
    pub validation: ValidationResult,
    /// Normalized data, ready to store
    pub data: NormalizedFraData,
}

/// Outcome of running one file through the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// File exceeds the configured size limit
    TooLarge {
        /// Name of the uploaded file
        filename: String,
        /// Size of the uploaded file
        size_bytes: u64,
        /// Configured limit
        limit_bytes: u64,
    },
    /// No parser claimed the file
    Unsupported {
        /// Name of the uploaded file
        filename: String,
        /// Size of the uploaded file
        size_bytes: u64,
    },
    /// The selected parser produced no usable data
    ParseFailed {
        /// Name of the uploaded file
        filename: String,
        /// Size of the uploaded file
        size_bytes: u64,
        /// Parser that claimed the file
        parser: String,
        /// Failed parse result
        parse: ParseResult,
    },
    /// Parsed data failed validation
    ValidationFailed {
        /// Name of the uploaded file
        filename: String,
        /// Size of the uploaded file
        size_bytes: u64,
        /// Parser that claimed the file
        parser: String,
        /// Parse result, data included
        parse: ParseResult,
        /// Validation result with errors
        validation: ValidationResult,
    },
    /// Import succeeded
    Normalized(Box<ImportReport>),
}

impl ImportOutcome {
    /// True when normalized data was produced
    pub fn is_success(&self) -> bool {
        matches!(self, ImportOutcome::Normalized(_))
    }

    /// Normalized data, on success
    pub fn data(&self) -> Option<&NormalizedFraData> {
        match self {
            ImportOutcome::Normalized(report) => Some(&report.data),
            _ => None,
        }
    }

    /// Name of the uploaded file
    pub fn filename(&self) -> &str {
        match self {
            ImportOutcome::TooLarge { filename, .. }
            | ImportOutcome::Unsupported { filename, .. }
            | ImportOutcome::ParseFailed { filename, .. }
            | ImportOutcome::ValidationFailed { filename, .. } => filename,
            ImportOutcome::Normalized(report) => &report.filename,
        }
    }

    /// Audit record for this outcome
    pub fn summary(&self) -> ImportSummary {
        match self {
            ImportOutcome::TooLarge {
                filename,
                size_bytes,
                limit_bytes,
            } => ImportSummary::failed(
                filename,
                *size_bytes,
                vec![format!(
                    "File too large ({:.1} MB). Maximum is {:.0} MB.",
                    *size_bytes as f64 / BYTES_PER_MB,
                    *limit_bytes as f64 / BYTES_PER_MB
                )],
            ),
            ImportOutcome::Unsupported {
                filename,
                size_bytes,
            } => ImportSummary::failed(
                filename,
                *size_bytes,
                vec!["No parser could handle this file format".to_string()],
            ),
            ImportOutcome::ParseFailed {
                filename,
                size_bytes,
                parser,
                parse,
            } => ImportSummary {
                parser_used: Some(parser.clone()),
                detected_vendor: Some(parser.clone()),
                detected_format: parse.detected_format.clone(),
                warnings: parse.warnings.clone(),
                ..ImportSummary::failed(filename, *size_bytes, parse.errors.clone())
            },
            ImportOutcome::ValidationFailed {
                filename,
                size_bytes,
                parser,
                parse,
                validation,
            } => ImportSummary {
                parser_used: Some(parser.clone()),
                detected_vendor: Some(parser.clone()),
                detected_format: parse.detected_format.clone(),
                data_points: Some(parse.point_count()),
                warnings: parse
                    .warnings
                    .iter()
                    .chain(validation.warnings())
                    .cloned()
                    .collect(),
                ..ImportSummary::failed(filename, *size_bytes, validation.errors().to_vec())
            },
            ImportOutcome::Normalized(report) => ImportSummary {
                original_filename: report.filename.clone(),
                file_size_bytes: report.size_bytes,
                status: match report.parse_status {
                    ParseStatus::Partial => ImportStatus::Partial,
                    _ => ImportStatus::Success,
                },
                parser_used: Some(report.parser.clone()),
                detected_vendor: Some(report.parser.clone()),
                detected_format: report.detected_format.clone(),
                data_points: Some(report.data.len()),
                frequency_range: report.data.frequency_range(),
                warnings: report
                    .parse_warnings
                    .iter()
                    .chain(report.validation.warnings())
                    .chain(&report.data.normalization_notes)
                    .cloned()
                    .collect(),
                errors: Vec::new(),
                error_message: None,
            },
        }
    }
}

/// Audit record persisted for every import attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Name of the uploaded file
    pub original_filename: String,
    /// Size of the uploaded file
    pub file_size_bytes: u64,
    /// Final status
    pub status: ImportStatus,
    /// Parser that claimed the file
    pub parser_used: Option<String>,
    /// Vendor as identified by detection (the parser name)
    pub detected_vendor: Option<String>,
    /// Format tag reported by the parser
    pub detected_format: Option<String>,
    /// Number of points stored (or parsed, when validation failed)
    pub data_points: Option<usize>,
    /// `"{min:.1} Hz - {max:.1} Hz"` of the stored data
    pub frequency_range: Option<String>,
    /// Parse warnings, then validation warnings, then normalization notes
    pub warnings: Vec<String>,
    /// Errors that stopped the import
    pub errors: Vec<String>,
    /// Errors joined with `"; "`
    pub error_message: Option<String>,
}

impl ImportSummary {
    fn failed(filename: &str, size_bytes: u64, errors: Vec<String>) -> Self {
        Self {
            original_filename: filename.to_string(),
            file_size_bytes: size_bytes,
            status: ImportStatus::Failed,
            parser_used: None,
            detected_vendor: None,
            detected_format: None,
            data_points: None,
            frequency_range: None,
            warnings: Vec::new(),
            error_message: (!errors.is_empty()).then(|| errors.join("; ")),
            errors,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Detection, parsing, validation and normalization for one deployment
#[derive(Debug)]
pub struct ImportPipeline {
    registry: ParserRegistry,
    config: PipelineConfig,
}

impl Default for ImportPipeline {
    fn default() -> Self {
        Self::new(ParserRegistry::with_default_parsers(), PipelineConfig::default())
    }
}

impl ImportPipeline {
    /// Create a pipeline over a registry and configuration
    pub fn new(registry: ParserRegistry, config: PipelineConfig) -> Self {
        Self { registry, config }
    }

    /// Pipeline with the built-in parsers
    pub fn with_config(config: PipelineConfig) -> Self {
        Self::new(ParserRegistry::with_default_parsers(), config)
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parser registry
    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Select a parser from the configured header window of `bytes`
    pub fn detect(&self, filename: &str, bytes: &[u8]) -> Option<&dyn FraParser> {
        let window = bytes.len().min(self.config.import.header_sniff_bytes);
        self.registry.detect_parser(filename, &bytes[..window])
    }

    /// Detect and parse; `None` when the format is unsupported
    pub fn parse(&self, filename: &str, bytes: &[u8]) -> Option<(&dyn FraParser, ParseResult)> {
        let parser = self.detect(filename, bytes)?;
        Some((parser, parser.parse(filename, bytes)))
    }

    /// Validate parsed data against the configured bounds
    pub fn validate(&self, data: &RawFraData) -> ValidationResult {
        validate_fra_data(
            &data.frequency_hz,
            &data.magnitude_db,
            data.phase_degrees.as_deref(),
            &self.config.validation,
        )
    }

    /// Normalize parsed data with the configured options
    pub fn normalize(&self, data: &RawFraData) -> NormalizedFraData {
        normalize_fra_data(data, &self.config.normalization)
    }

    /// Run one file through every stage
    pub fn run(&self, filename: &str, bytes: &[u8]) -> ImportOutcome {
        let size_bytes = bytes.len() as u64;
        let limit_bytes = self.config.import.max_file_size_bytes();
        if size_bytes > limit_bytes {
            warn!("{filename}: rejected, {size_bytes} bytes exceeds limit of {limit_bytes}");
            return ImportOutcome::TooLarge {
                filename: filename.to_string(),
                size_bytes,
                limit_bytes,
            };
        }

        let Some((parser, parse)) = self.parse(filename, bytes) else {
            warn!("{filename}: no parser could handle this file");
            return ImportOutcome::Unsupported {
                filename: filename.to_string(),
                size_bytes,
            };
        };
        let parser_name = parser.name().to_string();
        info!("{filename}: parsed with {parser_name} ({})", parse.status);

        let Some(raw) = parse.data.as_ref().filter(|_| parse.is_ok()) else {
            warn!("{filename}: parse failed: {}", parse.errors.join("; "));
            return ImportOutcome::ParseFailed {
                filename: filename.to_string(),
                size_bytes,
                parser: parser_name,
                parse,
            };
        };

        let validation = self.validate(raw);
        if !validation.is_valid() {
            warn!("{filename}: validation failed: {}", validation.errors().join("; "));
            return ImportOutcome::ValidationFailed {
                filename: filename.to_string(),
                size_bytes,
                parser: parser_name,
                parse,
                validation,
            };
        }
        info!(
            "{filename}: validated {} points with {} warning(s)",
            validation.stats().total_points,
            validation.warnings().len()
        );

        let data = self.normalize(raw);
        info!(
            "{filename}: normalized to {} points ({} note(s))",
            data.len(),
            data.normalization_notes.len()
        );

        ImportOutcome::Normalized(Box::new(ImportReport {
            filename: filename.to_string(),
            size_bytes,
            parser: parser_name,
            parse_status: parse.status,
            detected_format: parse.detected_format,
            parse_warnings: parse.warnings,
            validation,
            data,
        }))
    }
}
