//! Vendor-specific text exports.
//!
//! Omicron, Megger and Doble instruments all export a header block of
//! `key: value` lines followed by delimited frequency/magnitude/phase rows.
//! They differ in brand strings and file extensions, which [`VendorProfile`]
//! captures, so one [`VendorTextParser`] handles all three.

use log::debug;

use super::metadata::apply_metadata;
use super::text::{
    contains_any_token, decode_text, is_data_line, looks_like_xml, metadata_pair, parse_number,
    split_data_fields, split_lines,
};
use super::{FraParser, ParserError};
use crate::model::{ParseResult, RawFraData};

/// Identification of one instrument vendor's export convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorProfile {
    /// Parser name, also used as the detected format tag
    pub name: &'static str,
    /// Vendor label written into the parsed data
    pub vendor: &'static str,
    /// Supported file extensions
    pub extensions: &'static [&'static str],
    /// Lowercase brand strings searched for in the header
    pub brand_tokens: &'static [&'static str],
}

impl VendorProfile {
    /// Omicron FRAnalyzer
    pub const OMICRON: VendorProfile = VendorProfile {
        name: "omicron",
        vendor: "Omicron",
        extensions: &[".csv", ".txt", ".fra", ".xml"],
        brand_tokens: &["omicron", "franalyzer"],
    };

    /// Megger FRAX series
    pub const MEGGER_FRAX: VendorProfile = VendorProfile {
        name: "megger_frax",
        vendor: "Megger FRAX",
        extensions: &[".csv", ".txt", ".frax", ".xml"],
        brand_tokens: &["megger", "frax"],
    };

    /// Doble M4000 / M5000
    pub const DOBLE: VendorProfile = VendorProfile {
        name: "doble",
        vendor: "Doble",
        extensions: &[".csv", ".txt", ".m4000", ".xml"],
        brand_tokens: &["doble", "m4000", "m5000"],
    };
}

/// Parser for a vendor's header-plus-rows text export
#[derive(Debug, Clone)]
pub struct VendorTextParser {
    profile: VendorProfile,
}

impl VendorTextParser {
    /// Create a parser for the given vendor profile
    pub fn new(profile: VendorProfile) -> Self {
        Self { profile }
    }

    /// Omicron FRAnalyzer exports
    pub fn omicron() -> Self {
        Self::new(VendorProfile::OMICRON)
    }

    /// Megger FRAX exports
    pub fn megger_frax() -> Self {
        Self::new(VendorProfile::MEGGER_FRAX)
    }

    /// Doble M-series exports
    pub fn doble() -> Self {
        Self::new(VendorProfile::DOBLE)
    }

    /// The vendor profile this parser matches
    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    fn parse_text(&self, filename: &str, text: &str) -> ParseResult {
        let VendorProfile { name, vendor, .. } = self.profile;
        let empty_error = format!("No valid data rows found in {vendor} file");

        let lines = split_lines(text.trim());
        let mut metadata = Vec::new();
        let mut data_start = None;

        for (i, line) in lines.iter().enumerate() {
            let stripped = line.trim();
            if let Some(pair) = metadata_pair(stripped) {
                metadata.push(pair);
                continue;
            }
            if is_data_line(stripped) {
                data_start = Some(i);
                break;
            }
        }

        let Some(data_start) = data_start else {
            return ParseResult::failed(filename, name, empty_error);
        };

        let mut frequency = Vec::new();
        let mut magnitude = Vec::new();
        let mut phase = Vec::new();
        let mut bad_rows = 0usize;

        for (offset, line) in lines[data_start..].iter().enumerate() {
            let stripped = line.trim();
            if stripped.is_empty() {
                continue;
            }

            match parse_row(&split_data_fields(stripped)) {
                Some((f, m, p)) => {
                    frequency.push(f);
                    magnitude.push(m);
                    if let Some(p) = p {
                        phase.push(p);
                    }
                }
                None => {
                    debug!("{name}: skipping line {}: {stripped:?}", data_start + offset + 1);
                    bad_rows += 1;
                }
            }
        }

        let mut warnings = Vec::new();
        if bad_rows > 0 {
            warnings.push(format!("Skipped {bad_rows} unparseable row(s)"));
        }

        let mut data = RawFraData::new(frequency, magnitude);
        if !phase.is_empty() {
            data.phase_degrees = Some(phase);
        }
        data.vendor = Some(vendor.to_string());
        apply_metadata(&mut data, &metadata);

        ParseResult::from_data(data, bad_rows, warnings, filename, name, &empty_error)
    }

    #[cfg(feature = "xml")]
    fn parse_xml(&self, filename: &str, bytes: &[u8]) -> ParseResult {
        super::xml::parse_xml_export(filename, bytes, self.profile.vendor, self.profile.name)
    }

    #[cfg(not(feature = "xml"))]
    fn parse_xml(&self, filename: &str, _bytes: &[u8]) -> ParseResult {
        ParseResult::failed(
            filename,
            self.profile.name,
            "XML exports require the `xml` feature",
        )
    }
}

/// Frequency and magnitude are required; a phase column, when present, must parse
fn parse_row(fields: &[&str]) -> Option<(f64, f64, Option<f64>)> {
    let f = parse_number(fields.first()?)?;
    let m = parse_number(fields.get(1)?)?;
    let p = match fields.get(2) {
        Some(field) => Some(parse_number(field)?),
        None => None,
    };
    Some((f, m, p))
}

impl FraParser for VendorTextParser {
    fn name(&self) -> &'static str {
        self.profile.name
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        self.profile.extensions
    }

    fn detect(&self, filename: &str, header_bytes: &[u8]) -> Result<bool, ParserError> {
        if !self.can_handle_extension(filename) {
            return Ok(false);
        }

        let text = decode_text(header_bytes);
        Ok(contains_any_token(&text, self.profile.brand_tokens))
    }

    fn parse(&self, filename: &str, bytes: &[u8]) -> ParseResult {
        let text = decode_text(bytes);
        if looks_like_xml(&text) {
            debug!("{}: {filename} is an XML export", self.profile.name);
            return self.parse_xml(filename, bytes);
        }
        self.parse_text(filename, &text)
    }
}
