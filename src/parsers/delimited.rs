//! Generic delimited-text parser.
//!
//! Handles CSV/TSV-like exports from any instrument:
//! - delimiter sniffed among comma, tab, semicolon and pipe (whitespace as a
//!   last resort)
//! - optional header row matched against frequency/magnitude/phase synonyms
//! - `#` / `//` comment lines scanned for `key: value` metadata

use log::debug;
use regex::Regex;
use std::sync::LazyLock;

use super::metadata::apply_metadata;
use super::text::{decode_text, parse_number, split_lines};
use super::{FraParser, ParserError};
use crate::model::{ParseResult, RawFraData};

const NAME: &str = "generic_csv";
const FORMAT: &str = "csv";
const VENDOR: &str = "Generic CSV";
const EXTENSIONS: &[&str] = &[".csv", ".txt", ".tsv"];

/// Number of leading data lines used to sniff the delimiter
const DELIMITER_SAMPLE_LINES: usize = 5;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

static FREQ_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:f|freq|frequency)(?:[\s_]*[(\[]?\s*hz\s*[)\]]?)?$").expect("valid regex")
});

static MAG_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:mag|magnitude|amplitude|gain|tf|impedance|transfer[\s_]?function)(?:[\s_]*[(\[]?\s*(?:db|ohms?|Ω)\s*[)\]]?)?)$",
    )
    .expect("valid regex")
});

static PHASE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:phase|angle|arg)(?:[\s_]*[(\[]?\s*(?:deg|degrees|°)\s*[)\]]?)?$")
        .expect("valid regex")
});

static COMMENT_METADATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[#/]+\s*(.+?)\s*[:=]\s*(.+)$").expect("valid regex"));

/// Field separator chosen for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    /// A single-byte separator handled by the CSV reader
    Byte(u8),
    /// Runs of whitespace
    Whitespace,
}

/// Column positions of the three series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    frequency: usize,
    magnitude: usize,
    phase: Option<usize>,
}

impl ColumnMap {
    fn positional(ncols: usize) -> Self {
        Self {
            frequency: 0,
            magnitude: 1,
            phase: (ncols >= 3).then_some(2),
        }
    }
}

/// Parser for generic delimited text files
#[derive(Debug, Clone, Default)]
pub struct GenericCsvParser;

impl GenericCsvParser {
    /// Create a new generic CSV parser
    pub fn new() -> Self {
        Self
    }
}

impl FraParser for GenericCsvParser {
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

        let text = decode_text(header_bytes);
        Ok(split_lines(&text)
            .into_iter()
            .map(str::trim)
            .filter(|line| !is_comment(line))
            .any(has_numeric_pair))
    }

    fn parse(&self, filename: &str, bytes: &[u8]) -> ParseResult {
        let text = decode_text(bytes);
        let lines = split_lines(text.trim());
        if lines.len() < 2 {
            return ParseResult::failed(filename, FORMAT, "File has fewer than 2 lines");
        }

        let mut metadata = Vec::new();
        let mut data_lines = Vec::new();
        for line in &lines {
            let stripped = line.trim();
            if is_comment(stripped) {
                if let Some(caps) = COMMENT_METADATA.captures(stripped) {
                    metadata.push((caps[1].trim().to_string(), caps[2].trim().to_string()));
                }
                continue;
            }
            if !stripped.is_empty() {
                data_lines.push(stripped);
            }
        }

        if data_lines.len() < 2 {
            return ParseResult::failed(
                filename,
                FORMAT,
                "No data lines found after stripping comments",
            );
        }

        let delimiter = detect_delimiter(&data_lines[..data_lines.len().min(DELIMITER_SAMPLE_LINES)]);
        debug!("{NAME}: {filename} uses delimiter {delimiter:?}");

        let mut rows = read_rows(&data_lines, delimiter).into_iter();
        let first_row = rows.next().flatten().unwrap_or_default();
        let mut warnings = Vec::new();

        let (columns, first_is_data) = if is_numeric_row(&first_row) {
            if first_row.len() < 2 {
                return ParseResult::failed(
                    filename,
                    FORMAT,
                    format!("Only {} column(s) found; need at least 2", first_row.len()),
                );
            }
            warnings.push(
                "No header row detected; assuming column order: frequency, magnitude, phase"
                    .to_string(),
            );
            (ColumnMap::positional(first_row.len()), true)
        } else {
            match match_columns(&first_row) {
                Some(columns) => (columns, false),
                None if first_row.len() >= 2 => {
                    warnings.push(format!(
                        "Could not match headers {first_row:?}; assuming column order: frequency, magnitude, phase"
                    ));
                    (ColumnMap::positional(first_row.len()), false)
                }
                None => {
                    return ParseResult::failed(
                        filename,
                        FORMAT,
                        format!("Only {} column(s) found; need at least 2", first_row.len()),
                    );
                }
            }
        };

        let mut frequency = Vec::new();
        let mut magnitude = Vec::new();
        let mut phase = Vec::new();
        let mut bad_rows = 0usize;

        let data_rows = first_is_data.then_some(Some(first_row)).into_iter().chain(rows);
        for row in data_rows {
            match row.as_deref().and_then(|cols| parse_row(cols, columns)) {
                Some((f, m, p)) => {
                    frequency.push(f);
                    magnitude.push(m);
                    if let Some(p) = p {
                        phase.push(p);
                    }
                }
                None => {
                    debug!("{NAME}: skipping row {row:?}");
                    bad_rows += 1;
                }
            }
        }

        if bad_rows > 0 {
            warnings.push(format!("Skipped {bad_rows} unparseable row(s)"));
        }

        let mut data = RawFraData::new(frequency, magnitude);
        if !phase.is_empty() {
            data.phase_degrees = Some(phase);
        }
        data.vendor = Some(VENDOR.to_string());
        apply_metadata(&mut data, &metadata);

        ParseResult::from_data(
            data,
            bad_rows,
            warnings,
            filename,
            FORMAT,
            "No valid data rows could be parsed",
        )
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}

/// A line with at least two numeric fields under some candidate delimiter
fn has_numeric_pair(line: &str) -> bool {
    CANDIDATE_DELIMITERS
        .iter()
        .any(|&d| two_numeric(line.split(char::from(d))))
        || two_numeric(line.split_whitespace())
}

fn two_numeric<'a>(fields: impl Iterator<Item = &'a str>) -> bool {
    fields.filter(|field| parse_number(field).is_some()).take(2).count() == 2
}

/// Pick the delimiter that occurs most consistently across the sample lines
pub(crate) fn detect_delimiter(sample: &[&str]) -> Delimiter {
    let counts: Vec<(u8, Vec<usize>)> = CANDIDATE_DELIMITERS
        .iter()
        .map(|&d| (d, sample.iter().map(|line| line.bytes().filter(|&b| b == d).count()).collect()))
        .collect();

    let consistent = counts
        .iter()
        .filter(|(_, per_line)| {
            per_line.first().is_some_and(|&n| n > 0) && per_line.windows(2).all(|w| w[0] == w[1])
        })
        .fold(None, |best: Option<(u8, usize)>, (d, per_line)| {
            let n = per_line[0];
            match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((*d, n)),
            }
        });
    if let Some((d, _)) = consistent {
        return Delimiter::Byte(d);
    }

    let most_frequent = counts
        .iter()
        .map(|(d, per_line)| (*d, per_line.iter().sum::<usize>()))
        .fold(None, |best: Option<(u8, usize)>, (d, total)| match best {
            Some((_, best_total)) if best_total >= total => best,
            _ if total > 0 => Some((d, total)),
            _ => best,
        });
    if let Some((d, _)) = most_frequent {
        return Delimiter::Byte(d);
    }

    if sample.iter().any(|line| line.contains(char::is_whitespace)) {
        Delimiter::Whitespace
    } else {
        Delimiter::Byte(b',')
    }
}

/// Split the data block into rows of trimmed cells.
///
/// One CSV reader covers the whole block. A row the reader rejects comes
/// back as `None`.
pub(crate) fn read_rows(lines: &[&str], delimiter: Delimiter) -> Vec<Option<Vec<String>>> {
    let d = match delimiter {
        Delimiter::Whitespace => {
            return lines
                .iter()
                .map(|line| Some(line.split_whitespace().map(str::to_string).collect()))
                .collect();
        }
        Delimiter::Byte(d) => d,
    };

    let block = lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(d)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(block.as_bytes());

    reader
        .records()
        .map(|record| match record {
            Ok(record) => Some(record.iter().map(unquote).collect()),
            Err(e) => {
                debug!("{NAME}: CSV reader rejected a row: {e}");
                None
            }
        })
        .collect()
}

/// Trimmed cell without its enclosing quotes. The reader keeps quotes that
/// follow leading whitespace.
fn unquote(cell: &str) -> String {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map_or(cell, str::trim)
        .to_string()
}

/// Every non-empty cell is numeric (trailing delimiters leave empty cells)
fn is_numeric_row(row: &[String]) -> bool {
    let mut cells = row.iter().filter(|cell| !cell.is_empty()).peekable();
    cells.peek().is_some() && cells.all(|cell| parse_number(cell).is_some())
}

/// Match header names to column positions; `None` unless frequency and
/// magnitude are both found
fn match_columns(headers: &[String]) -> Option<ColumnMap> {
    let mut frequency = None;
    let mut magnitude = None;
    let mut phase = None;

    for (i, header) in headers.iter().enumerate() {
        let header = header.trim();
        if frequency.is_none() && FREQ_HEADER.is_match(header) {
            frequency = Some(i);
        } else if magnitude.is_none() && MAG_HEADER.is_match(header) {
            magnitude = Some(i);
        } else if phase.is_none() && PHASE_HEADER.is_match(header) {
            phase = Some(i);
        }
    }

    Some(ColumnMap {
        frequency: frequency?,
        magnitude: magnitude?,
        phase,
    })
}

/// An empty phase cell means "no phase for this point"; a non-numeric one
/// rejects the row
fn parse_row(cols: &[String], columns: ColumnMap) -> Option<(f64, f64, Option<f64>)> {
    let f = parse_number(cols.get(columns.frequency)?)?;
    let m = parse_number(cols.get(columns.magnitude)?)?;
    let p = match columns.phase.and_then(|i| cols.get(i)) {
        Some(cell) if !cell.is_empty() => Some(parse_number(cell)?),
        _ => None,
    };
    Some((f, m, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(&["1,2,3", "4,5,6"]), Delimiter::Byte(b','));
        assert_eq!(detect_delimiter(&["1\t2\t3", "4\t5\t6"]), Delimiter::Byte(b'\t'));
        assert_eq!(detect_delimiter(&["1;2", "4;5"]), Delimiter::Byte(b';'));
        assert_eq!(detect_delimiter(&["1|2", "4|5"]), Delimiter::Byte(b'|'));
        assert_eq!(detect_delimiter(&["1   2", "4 5"]), Delimiter::Whitespace);
        assert_eq!(detect_delimiter(&["12", "45"]), Delimiter::Byte(b','));
    }

    #[test]
    fn test_semicolon_beats_decimal_commas_when_consistent() {
        // European export: semicolon-separated, comma decimal marks vary per line
        let sample = ["Frequenz;Betrag", "20;-2,1", "40;-2"];
        assert_eq!(detect_delimiter(&sample), Delimiter::Byte(b';'));
    }

    #[test]
    fn test_header_synonyms() {
        let map = match_columns(&headers(&["Frequency (Hz)", "Magnitude [dB]", "Phase (deg)"]))
            .unwrap();
        assert_eq!(map, ColumnMap { frequency: 0, magnitude: 1, phase: Some(2) });

        let map = match_columns(&headers(&["Phase", "freq", "Transfer Function"])).unwrap();
        assert_eq!(map, ColumnMap { frequency: 1, magnitude: 2, phase: Some(0) });

        let map = match_columns(&headers(&["f (hz)", "gain"])).unwrap();
        assert_eq!(map, ColumnMap { frequency: 0, magnitude: 1, phase: None });

        assert!(match_columns(&headers(&["Channel", "Reading"])).is_none());
        assert!(match_columns(&headers(&["Frequency", "Notes"])).is_none());
    }

    #[test]
    fn test_read_rows_handles_quotes() {
        let rows = read_rows(&["\"100\", \"-3.5\" ,7", "\" 200 \",-4"], Delimiter::Byte(b','));
        assert_eq!(rows[0], Some(headers(&["100", "-3.5", "7"])));
        assert_eq!(rows[1], Some(headers(&["200", "-4"])));

        let rows = read_rows(&["1   2", "3 4"], Delimiter::Whitespace);
        assert_eq!(rows, vec![Some(headers(&["1", "2"])), Some(headers(&["3", "4"]))]);
    }

    #[test]
    fn test_read_rows_one_row_per_line() {
        let lines = ["Frequency;Magnitude", "20;-1.5", "40;-2.5;"];
        let rows = read_rows(&lines, Delimiter::Byte(b';'));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], Some(headers(&["40", "-2.5", ""])));
    }

    #[test]
    fn test_numeric_row_ignores_trailing_delimiter() {
        assert!(is_numeric_row(&headers(&["100", "-3.0", ""])));
        assert!(!is_numeric_row(&headers(&["Frequency", "-3.0"])));
        assert!(!is_numeric_row(&headers(&["", ""])));
    }

    #[test]
    fn test_numeric_pair_detection() {
        assert!(has_numeric_pair("100,-3.0"));
        assert!(has_numeric_pair("100 -3.0"));
        assert!(has_numeric_pair("100|-3.0|4"));
        assert!(!has_numeric_pair("Report generated 2024"));
        assert!(!has_numeric_pair("hello, world"));
    }
}
