use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ModelError, RawFraData};

/// Outcome of a parse attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    /// Every row/point was read
    Success,
    /// Some rows/points were skipped but at least one point remains
    Partial,
    /// No usable data
    Failed,
}

impl ParseStatus {
    /// Lowercase label used in audit records
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseStatus::Success => "success",
            ParseStatus::Partial => "partial",
            ParseStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a parse operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Parse status
    pub status: ParseStatus,

    /// Parsed data, present unless the status is `Failed`
    pub data: Option<RawFraData>,

    /// Non-fatal issues (skipped rows, column fallbacks)
    pub warnings: Vec<String>,

    /// Fatal issues, only meaningful when the status is `Failed`
    pub errors: Vec<String>,

    /// Name of the uploaded file
    pub original_filename: Option<String>,

    /// Format tag of the parser that produced this result
    pub detected_format: Option<String>,
}

impl ParseResult {
    /// Build a successful or partial result from parsed data.
    ///
    /// The status is `Partial` when `skipped > 0`, `Failed` (with `empty_error`)
    /// when the data holds no points.
    pub fn from_data(
        data: RawFraData,
        skipped: usize,
        warnings: Vec<String>,
        filename: &str,
        format: &str,
        empty_error: &str,
    ) -> Self {
        if data.is_empty() {
            let mut failed = Self::failed(filename, format, empty_error);
            failed.warnings = warnings;
            return failed;
        }

        let status = if skipped == 0 {
            ParseStatus::Success
        } else {
            ParseStatus::Partial
        };

        Self {
            status,
            data: Some(data),
            warnings,
            errors: Vec::new(),
            original_filename: Some(filename.to_string()),
            detected_format: Some(format.to_string()),
        }
    }

    /// Build a failed result with a single error message
    pub fn failed(filename: &str, format: &str, error: impl Into<String>) -> Self {
        Self {
            status: ParseStatus::Failed,
            data: None,
            warnings: Vec::new(),
            errors: vec![error.into()],
            original_filename: Some(filename.to_string()),
            detected_format: Some(format.to_string()),
        }
    }

    /// True for `Success` and `Partial`
    pub fn is_ok(&self) -> bool {
        matches!(self.status, ParseStatus::Success | ParseStatus::Partial)
    }

    /// Number of parsed points (0 when failed)
    pub fn point_count(&self) -> usize {
        self.data.as_ref().map_or(0, RawFraData::len)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }
}
