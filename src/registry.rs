//! Parser selection.
//!
//! [`ParserRegistry`] holds parsers in registration order and picks one per
//! file in two tiers: vendor-specific parsers first, generic fallbacks after.
//! Brand strings are far more precise than content sniffing, so a vendor CSV
//! is never claimed by the generic CSV parser.

use log::debug;

use crate::parsers::{FraParser, GenericCsvParser, VendorTextParser};
#[cfg(feature = "xml")]
use crate::parsers::GenericXmlParser;

/// Ordered collection of parsers
#[derive(Default)]
pub struct ParserRegistry {
    parsers: Vec<Box<dyn FraParser>>,
}

impl ParserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in parser: Omicron, Megger FRAX, Doble,
    /// generic CSV and (with the `xml` feature) generic XML
    pub fn with_default_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(VendorTextParser::omicron());
        registry.register(VendorTextParser::megger_frax());
        registry.register(VendorTextParser::doble());
        registry.register(GenericCsvParser::new());
        #[cfg(feature = "xml")]
        registry.register(GenericXmlParser::new());
        registry
    }

    /// Append a parser
    pub fn register<P: FraParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
    }

    /// Registered parsers in registration order
    pub fn parsers(&self) -> impl Iterator<Item = &dyn FraParser> {
        self.parsers.iter().map(|p| p.as_ref())
    }

    /// Look up a parser by name
    pub fn get(&self, name: &str) -> Option<&dyn FraParser> {
        self.parsers().find(|p| p.name() == name)
    }

    /// Number of registered parsers
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Select the parser for a file.
    ///
    /// Vendor-specific parsers are tried before generic ones, each tier in
    /// registration order. A parser whose detection errors is skipped.
    /// `None` means the format is unsupported.
    ///
    /// `header_bytes` is inspected in full, so pass only the header window.
    pub fn detect_parser(&self, filename: &str, header_bytes: &[u8]) -> Option<&dyn FraParser> {
        let vendor = self.parsers().filter(|p| !p.is_generic());
        let generic = self.parsers().filter(|p| p.is_generic());

        vendor.chain(generic).find(|parser| {
            match parser.detect(filename, header_bytes) {
                Ok(matched) => {
                    debug!("{}: detect({filename}) = {matched}", parser.name());
                    matched
                }
                Err(e) => {
                    debug!("{}: detection error on {filename}: {e}", parser.name());
                    false
                }
            }
        })
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.parsers().map(|p| p.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParseResult;
    use crate::parsers::ParserError;

    /// Claims every file, registered ahead of the built-ins
    struct GreedyGeneric;

    impl FraParser for GreedyGeneric {
        fn name(&self) -> &'static str {
            "generic_greedy"
        }
        fn supported_extensions(&self) -> &'static [&'static str] {
            &[".csv"]
        }
        fn detect(&self, _: &str, _: &[u8]) -> Result<bool, ParserError> {
            Ok(true)
        }
        fn parse(&self, filename: &str, _: &[u8]) -> ParseResult {
            ParseResult::failed(filename, "greedy", "not a real parser")
        }
    }

    /// Detection always errors
    struct Broken;

    impl FraParser for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn supported_extensions(&self) -> &'static [&'static str] {
            &[".csv"]
        }
        fn detect(&self, _: &str, _: &[u8]) -> Result<bool, ParserError> {
            Err(ParserError::DetectionFailed("simulated".into()))
        }
        fn parse(&self, filename: &str, _: &[u8]) -> ParseResult {
            ParseResult::failed(filename, "broken", "unreachable")
        }
    }

    #[test]
    fn test_default_order() {
        let registry = ParserRegistry::with_default_parsers();
        let names: Vec<_> = registry.parsers().map(|p| p.name()).collect();
        let mut expected = vec!["omicron", "megger_frax", "doble", "generic_csv"];
        if cfg!(feature = "xml") {
            expected.push("generic_xml");
        }
        assert_eq!(names, expected);
        assert!(registry.get("doble").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_vendor_tier_wins_over_registration_order() {
        let mut registry = ParserRegistry::new();
        registry.register(GreedyGeneric);
        registry.register(VendorTextParser::omicron());

        let header = b"Omicron FRAnalyzer\n20,-1\n";
        let parser = registry.detect_parser("a.csv", header).unwrap();
        assert_eq!(parser.name(), "omicron");

        let parser = registry.detect_parser("a.csv", b"20,-1\n").unwrap();
        assert_eq!(parser.name(), "generic_greedy");
    }

    #[test]
    fn test_detection_error_is_no_match() {
        let mut registry = ParserRegistry::new();
        registry.register(Broken);
        registry.register(GenericCsvParser::new());

        let parser = registry.detect_parser("a.csv", b"20,-1\n40,-2\n").unwrap();
        assert_eq!(parser.name(), "generic_csv");

        let mut only_broken = ParserRegistry::new();
        only_broken.register(Broken);
        assert!(only_broken.detect_parser("a.csv", b"20,-1\n").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ParserRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.detect_parser("a.csv", b"1,2\n").is_none());
    }
}
