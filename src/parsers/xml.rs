//! Generic XML parser.
//!
//! Handles documents such as
//! `<measurement><point><freq/><mag/><phase/></point>...</measurement>` or
//! `<fra_data><data_point freq="..." mag="..."/>...</fra_data>` without
//! knowing the schema: the data points are the largest group of same-named
//! siblings, and values are found by name pattern.

use log::debug;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

use super::metadata::{fill_field, MetadataField};
use super::text::{decode_text, looks_like_xml};
use super::{FraParser, ParserError};
use crate::model::{ParseResult, RawFraData};

const NAME: &str = "generic_xml";
const FORMAT: &str = "xml";
const VENDOR: &str = "Generic XML";
const EXTENSIONS: &[&str] = &[".xml"];

/// Minimum number of same-tag siblings treated as a data-point list
const MIN_POINT_GROUP: usize = 5;

/// Deepest level (root = 0) visited by the metadata walk
const METADATA_MAX_DEPTH: usize = 4;

/// Open elements allowed at once; the tree walks recurse per level
pub(crate) const MAX_XML_DEPTH: usize = 256;

static FREQ_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)freq|f_hz").expect("valid regex"));

static MAG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mag|amplitude|gain|transfer|impedance|tf").expect("valid regex")
});

static PHASE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)phase|angle|arg").expect("valid regex"));

/// Element of a parsed document, names stripped of namespace prefixes
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct XmlNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn from_start(e: &BytesStart, decoder: Decoder) -> Result<Self, ParserError> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.decode_and_unescape_value(decoder)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            tag: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// First attribute or direct child whose name matches `pattern` and whose
    /// value parses as a number
    fn numeric_value(&self, pattern: &Regex) -> Option<f64> {
        let from_attributes = self
            .attributes
            .iter()
            .filter(|(name, _)| pattern.is_match(name))
            .find_map(|(_, value)| value.trim().parse().ok());

        from_attributes.or_else(|| {
            self.children
                .iter()
                .filter(|child| pattern.is_match(&child.tag))
                .find_map(|child| child.text.trim().parse().ok())
        })
    }
}

/// Build the element tree of a complete document
pub(crate) fn parse_document(text: &str) -> Result<XmlNode, ParserError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(ParserError::InvalidStructure(format!(
                        "nesting deeper than {MAX_XML_DEPTH} elements"
                    )));
                }
                stack.push(XmlNode::from_start(e, reader.decoder())?);
            }
            Event::Empty(ref e) => {
                let node = XmlNode::from_start(e, reader.decoder())?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    ParserError::InvalidStructure("closing tag without an open element".into())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(t) => {
                let content = t.unescape()?;
                append_text(&mut stack, &content)?;
            }
            Event::CData(c) => {
                let content = String::from_utf8_lossy(&c).into_owned();
                append_text(&mut stack, &content)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParserError::InvalidStructure(format!(
            "unclosed element <{}>",
            open.tag
        )));
    }
    root.ok_or_else(|| ParserError::InvalidStructure("document has no root element".into()))
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), ParserError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(ParserError::InvalidStructure(
            "document has more than one root element".into(),
        ));
    }
    *root = Some(node);
    Ok(())
}

fn append_text(stack: &mut [XmlNode], content: &str) -> Result<(), ParserError> {
    match stack.last_mut() {
        Some(node) => {
            node.text.push_str(content);
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err(ParserError::InvalidStructure(
            "text outside the root element".into(),
        )),
    }
}

/// Depth-first search for the first element whose most frequent child tag
/// repeats at least [`MIN_POINT_GROUP`] times
pub(crate) fn find_data_points(node: &XmlNode) -> Option<Vec<&XmlNode>> {
    let mut groups: Vec<(&str, Vec<&XmlNode>)> = Vec::new();
    for child in &node.children {
        match groups.iter_mut().find(|(tag, _)| *tag == child.tag) {
            Some((_, members)) => members.push(child),
            None => groups.push((child.tag.as_str(), vec![child])),
        }
    }

    // Ties go to the tag seen first
    let best = groups.into_iter().fold(None, |best: Option<Vec<&XmlNode>>, (_, members)| {
        match best {
            Some(b) if b.len() >= members.len() => Some(b),
            _ => Some(members),
        }
    });
    if let Some(members) = best.filter(|m| m.len() >= MIN_POINT_GROUP) {
        return Some(members);
    }

    node.children.iter().find_map(find_data_points)
}

/// XML names are matched like text keys, plus a bare `sn` substring for serials
fn classify_name(name: &str) -> Option<MetadataField> {
    MetadataField::classify(name)
        .or_else(|| name.to_lowercase().contains("sn").then_some(MetadataField::SerialNumber))
}

/// Bounded walk over element text and attributes, in document order
fn collect_metadata(node: &XmlNode, depth: usize, data: &mut RawFraData) {
    if depth > METADATA_MAX_DEPTH {
        return;
    }

    let text = node.text.trim();
    let named_values = std::iter::once((node.tag.as_str(), text))
        .filter(|(_, value)| !value.is_empty())
        .chain(
            node.attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );

    for (name, value) in named_values {
        if let Some(field) = classify_name(name) {
            data.extra_metadata
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
            fill_field(data, field, value);
        }
    }

    for child in &node.children {
        collect_metadata(child, depth + 1, data);
    }
}

/// Parse an XML FRA export, stamping `vendor` and `format` on the result.
///
/// Shared by the generic parser and by vendor parsers that receive XML.
pub(crate) fn parse_xml_export(
    filename: &str,
    bytes: &[u8],
    vendor: &str,
    format: &str,
) -> ParseResult {
    let text = decode_text(bytes);
    let root = match parse_document(&text) {
        Ok(root) => root,
        Err(e) => {
            debug!("{filename}: XML parse failed: {e}");
            return ParseResult::failed(filename, format, format!("Invalid XML: {e}"));
        }
    };

    let Some(points) = find_data_points(&root) else {
        return ParseResult::failed(
            filename,
            format,
            "Could not find repeating data-point elements in XML",
        );
    };
    debug!(
        "{filename}: {} candidate data points in <{}>",
        points.len(),
        points.first().map_or("", |p| p.tag.as_str())
    );

    let mut frequency = Vec::with_capacity(points.len());
    let mut magnitude = Vec::with_capacity(points.len());
    let mut phase = Vec::new();
    let mut skipped = 0usize;

    for point in points {
        let (Some(f), Some(m)) = (point.numeric_value(&FREQ_NAME), point.numeric_value(&MAG_NAME))
        else {
            skipped += 1;
            continue;
        };
        frequency.push(f);
        magnitude.push(m);
        if let Some(p) = point.numeric_value(&PHASE_NAME) {
            phase.push(p);
        }
    }

    let mut warnings = Vec::new();
    if skipped > 0 {
        warnings.push(format!(
            "Skipped {skipped} data point(s) missing frequency or magnitude"
        ));
    }

    let mut data = RawFraData::new(frequency, magnitude);
    if !phase.is_empty() {
        data.phase_degrees = Some(phase);
    }
    data.vendor = Some(vendor.to_string());
    collect_metadata(&root, 0, &mut data);

    ParseResult::from_data(
        data,
        skipped,
        warnings,
        filename,
        format,
        "No valid data points extracted from XML",
    )
}

/// Parser for XML documents with a repeated data-point element
#[derive(Debug, Clone, Default)]
pub struct GenericXmlParser;

impl GenericXmlParser {
    /// Create a new generic XML parser
    pub fn new() -> Self {
        Self
    }
}

impl FraParser for GenericXmlParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn detect(&self, filename: &str, header_bytes: &[u8]) -> Result<bool, ParserError> {
        if !self.can_handle_extension(filename) {
            return Ok(false);
        }
        Ok(looks_like_xml(&decode_text(header_bytes)))
    }

    fn parse(&self, filename: &str, bytes: &[u8]) -> ParseResult {
        parse_xml_export(filename, bytes, VENDOR, FORMAT)
    }
}
