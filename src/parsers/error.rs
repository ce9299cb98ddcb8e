/// Errors raised inside parsers.
///
/// These never escape [`FraParser::parse`](super::FraParser::parse), which
/// folds them into a failed [`ParseResult`](crate::model::ParseResult).
/// Errors from [`FraParser::detect`](super::FraParser::detect) are treated
/// by the registry as "does not match".
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// Error parsing XML
    #[cfg(feature = "xml")]
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Document is syntactically valid but structurally unusable
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// Content sniffing could not complete (for parsers outside this crate)
    #[error("Detection failed: {0}")]
    DetectionFailed(String),
}
