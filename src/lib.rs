//! # fra-ingest - Transformer FRA File Ingestion
//!
//! `fra-ingest` turns Frequency Response Analysis exports from diagnostic
//! instruments into one canonical, validated dataset per sweep.
//!
//! ## Key Features
//!
//! - **Format Detection**: vendor parsers (Omicron, Megger FRAX, Doble) are
//!   consulted before the generic CSV/XML parsers, so a branded export is never
//!   claimed by a catch-all.
//!
//! - **Tolerant Parsing**: unparseable rows are skipped and counted, header
//!   rows are matched against common synonyms, and files without headers fall
//!   back to positional columns.
//!
//! - **Validation**: structural errors reject a sweep; suspicious but usable
//!   data (out-of-band frequencies, outliers, duplicates) only raises warnings.
//!
//! - **Normalization**: finite, strictly ascending frequencies with an optional
//!   log-spaced resample and a controlled winding vocabulary.
//!
//! ## Quick Start
//!
//! ```rust
//! use fra_ingest::prelude::*;
//!
//! let mut csv = String::from("# Serial: T-1001\nFrequency (Hz),Magnitude (dB),Phase (deg)\n");
//! for i in 1..=50 {
//!     csv.push_str(&format!("{},{},{}\n", i * 40, -(i as f64) * 0.3, -(i as f64)));
//! }
//!
//! let pipeline = ImportPipeline::default();
//! let outcome = pipeline.run("t1001_hv.csv", csv.as_bytes());
//!
//! let data = outcome.data().expect("clean sweep imports");
//! assert_eq!(data.len(), 50);
//! assert_eq!(data.serial_number.as_deref(), Some("T-1001"));
//!
//! let summary = outcome.summary();
//! assert_eq!(summary.status, ImportStatus::Success);
//! println!("{}", summary.to_json_pretty()?);
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`model`]: raw, parse-result and normalized data types
//! - [`vocabulary`]: controlled winding-configuration terms
//! - [`parsers`]: the [`parsers::FraParser`] trait and the built-in parsers
//! - [`registry`]: ordered parser lookup
//! - [`validation`]: physics and structure checks with a report
//! - [`normalization`]: cleaning, sorting and resampling
//! - [`pipeline`]: one file through every stage, with an audit record
//! - [`config`]: TOML and environment configuration

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod model;
pub mod normalization;
pub mod parsers;
pub mod pipeline;
pub mod registry;
pub mod validation;
pub mod vocabulary;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigError, ImportConfig, PipelineConfig};
    pub use crate::model::{NormalizedFraData, ParseResult, ParseStatus, RawFraData};
    pub use crate::normalization::{normalize_fra_data, NormalizationOptions};
    #[cfg(feature = "xml")]
    pub use crate::parsers::GenericXmlParser;
    pub use crate::parsers::{FraParser, GenericCsvParser, ParserError, VendorTextParser};
    pub use crate::pipeline::{ImportOutcome, ImportPipeline, ImportStatus, ImportSummary};
    pub use crate::registry::ParserRegistry;
    pub use crate::validation::{validate_fra_data, ValidationConfig, ValidationResult};
    pub use crate::vocabulary::WindingConfig;
}
