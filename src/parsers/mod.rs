//! # FRA File Parsers
//!
//! One parser per export convention, all behind the [`FraParser`] trait:
//!
//! - [`VendorTextParser`] - Omicron FRAnalyzer, Megger FRAX and Doble M-series
//!   text exports, identified by brand strings in the file header
//! - [`GenericCsvParser`] - any delimited text with frequency/magnitude columns
//! - [`GenericXmlParser`] - XML documents with a repeated data-point element
//!   (requires the `xml` feature)
//!
//! Parsing is two-step. [`FraParser::detect`] looks at the file name and a
//! header window of content (by default [`HEADER_SNIFF_BYTES`], sized by the
//! caller); [`FraParser::parse`] consumes the whole
//! buffer and always returns a [`ParseResult`]. Malformed rows are counted and
//! skipped, never propagated.
//!
//! ## Example
//!
//! ```rust
//! use fra_ingest::parsers::{FraParser, GenericCsvParser};
//!
//! let csv = b"Frequency,Magnitude\n100,-3.0\n200,-4.5\n";
//! let parser = GenericCsvParser::new();
//! assert!(parser.detect("sweep.csv", csv).unwrap());
//!
//! let result = parser.parse("sweep.csv", csv);
//! assert!(result.is_ok());
//! assert_eq!(result.point_count(), 2);
//! ```

use std::ffi::OsStr;
use std::path::Path;

use crate::model::ParseResult;

mod delimited;
mod error;
mod metadata;
mod text;
mod vendor;
#[cfg(feature = "xml")]
mod xml;


pub use delimited::GenericCsvParser;
pub use error::ParserError;
pub use metadata::{parse_temperature, MetadataField};
pub use text::decode_text;
pub use vendor::{VendorProfile, VendorTextParser};
#[cfg(feature = "xml")]
pub use xml::GenericXmlParser;

/// Default size of the header window handed to detection
pub const HEADER_SNIFF_BYTES: usize = 4096;

/// Capability interface shared by every FRA parser
pub trait FraParser: Send + Sync {
    /// Identifying name (e.g. "omicron", "generic_csv")
    fn name(&self) -> &'static str;

    /// Lowercase file extensions including the dot (e.g. ".csv")
    fn supported_extensions(&self) -> &'static [&'static str];

    /// Exact, case-insensitive match of the file suffix against
    /// [`FraParser::supported_extensions`]
    fn can_handle_extension(&self, filename: &str) -> bool {
        file_extension(filename)
            .is_some_and(|ext| self.supported_extensions().contains(&ext.as_str()))
    }

    /// Generic parsers are tried only after every vendor-specific parser
    fn is_generic(&self) -> bool {
        self.name().contains("generic")
    }

    /// Return `true` if this parser can plausibly handle the file.
    ///
    /// `header_bytes` is the header window chosen by the caller; the
    /// pipeline cuts it to `import.header_sniff_bytes`.
    fn detect(&self, filename: &str, header_bytes: &[u8]) -> Result<bool, ParserError>;

    /// Parse the complete file
    fn parse(&self, filename: &str, bytes: &[u8]) -> ParseResult;
}

/// Lowercased suffix of `filename` including the leading dot
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(OsStr::to_str)
        .map(|ext| format!(".{}", ext.to_lowercase()))
}
