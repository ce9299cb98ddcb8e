use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Summary statistics, populated at every exit for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Number of frequency samples supplied
    pub total_points: usize,
    /// Points where both frequency and magnitude are finite
    pub valid_points: usize,
    /// Lowest finite frequency
    pub frequency_min_hz: Option<f64>,
    /// Highest finite frequency
    pub frequency_max_hz: Option<f64>,
    /// Lowest finite magnitude
    pub magnitude_min_db: Option<f64>,
    /// Highest finite magnitude
    pub magnitude_max_db: Option<f64>,
    /// A non-empty phase array was supplied
    pub has_phase: bool,
}

/// Outcome of validating one dataset.
///
/// Warnings and errors are append-only; recording an error clears
/// [`ValidationResult::is_valid`] for good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    is_valid: bool,
    warnings: Vec<String>,
    errors: Vec<String>,
    stats: ValidationStats,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
            stats: ValidationStats::default(),
        }
    }
}

impl ValidationResult {
    /// Empty, valid result carrying `stats`
    pub fn new(stats: ValidationStats) -> Self {
        Self {
            stats,
            ..Self::default()
        }
    }

    /// False once any error has been recorded
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Suspicious but usable data
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Problems that make normalization meaningless
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Point counts and ranges
    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }

    /// Record a warning
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Record an error and mark the result invalid
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    /// Any warnings recorded
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn range_line(min: Option<f64>, max: Option<f64>, unit: &str) -> String {
        match (min, max) {
            (Some(min), Some(max)) => format!("{min:.1} {unit} - {max:.1} {unit}"),
            _ => "n/a".to_string(),
        }
    }

    /// Format the report with colors (requires the `colorized_output` feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let stats = &self.stats;
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("FRA Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=====================").cyan()));
            output.push_str(&format!(
                "{}: {} total, {} finite\n",
                style("Points").bold(),
                stats.total_points,
                stats.valid_points
            ));
            output.push_str(&format!(
                "{}: {}\n",
                style("Frequency").bold(),
                Self::range_line(stats.frequency_min_hz, stats.frequency_max_hz, "Hz")
            ));
            output.push_str(&format!(
                "{}: {}\n",
                style("Magnitude").bold(),
                Self::range_line(stats.magnitude_min_db, stats.magnitude_max_db, "dB")
            ));
            output.push_str(&format!(
                "{}: {}\n\n",
                style("Phase").bold(),
                if stats.has_phase { "present" } else { "absent" }
            ));

            for error in &self.errors {
                output.push_str(&format!("[{}] {}: {}\n", FAIL, style("ERROR").red().bold(), error));
            }
            for warning in &self.warnings {
                output.push_str(&format!(
                    "[{}] {}: {}\n",
                    WARN,
                    style("WARNING").yellow().bold(),
                    warning
                ));
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} errors, {} warnings\n\n",
                style("Summary").bold(),
                style(self.errors.len()).red(),
                style(self.warnings.len()).yellow()
            ));

            if !self.is_valid {
                output.push_str(&format!("{}\n", style("Validation FAILED").red().bold()));
            } else if self.has_warnings() {
                output.push_str(&format!(
                    "{}\n",
                    style("Validation PASSED with warnings").yellow().bold()
                ));
            } else {
                output.push_str(&format!("{}\n", style("Validation PASSED").green().bold()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;

        writeln!(f, "FRA Validation Report")?;
        writeln!(f, "=====================")?;
        writeln!(f, "Points: {} total, {} finite", stats.total_points, stats.valid_points)?;
        writeln!(
            f,
            "Frequency: {}",
            Self::range_line(stats.frequency_min_hz, stats.frequency_max_hz, "Hz")
        )?;
        writeln!(
            f,
            "Magnitude: {}",
            Self::range_line(stats.magnitude_min_db, stats.magnitude_max_db, "dB")
        )?;
        writeln!(f, "Phase: {}", if stats.has_phase { "present" } else { "absent" })?;
        writeln!(f)?;

        for error in &self.errors {
            writeln!(f, "[✗] ERROR: {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "[⚠] WARNING: {}", warning)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} errors, {} warnings",
            self.errors.len(),
            self.warnings.len()
        )?;
        writeln!(f)?;

        if !self.is_valid {
            writeln!(f, "Validation FAILED")?;
        } else if self.has_warnings() {
            writeln!(f, "Validation PASSED with warnings")?;
        } else {
            writeln!(f, "Validation PASSED")?;
        }

        Ok(())
    }
}
