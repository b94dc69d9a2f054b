use crate::error::{Result, SynthFilterError};
use crate::filter::FilterOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Share of matched lines, in percent. `None` when no lines were read.
pub fn percentage(total: u64, matched: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(matched as f64 / total as f64 * 100.0)
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// The four data points shown after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_lines: u64,
    pub matched_lines: u64,
    pub percentage: f64,
    pub output_file: String,
}

impl Summary {
    pub fn new(outcome: &FilterOutcome, output: &Path) -> Result<Self> {
        let percentage = percentage(outcome.total_lines, outcome.matched_lines).ok_or_else(|| {
            SynthFilterError::ZeroTotal {
                output: output.to_path_buf(),
            }
        })?;

        let output_file = output
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| output.display().to_string());

        Ok(Self {
            total_lines: outcome.total_lines,
            matched_lines: outcome.matched_lines,
            percentage,
            output_file,
        })
    }

    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total lines processed: {}", group_thousands(self.total_lines))?;
        writeln!(f, "Matching lines:        {}", group_thousands(self.matched_lines))?;
        writeln!(f, "Percentage matched:    {}", self.percentage_label())?;
        write!(f, "Saved to:              {}", self.output_file)
    }
}

/// Human-readable summary of a run that wrote `output`.
pub fn format_summary(total: u64, matched: u64, output: &Path) -> Result<String> {
    let outcome = FilterOutcome {
        total_lines: total,
        matched_lines: matched,
    };
    Ok(Summary::new(&outcome, output)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(100000), "100,000");
    }

    #[test]
    fn test_percentage_one_decimal() {
        let summary = Summary::new(
            &FilterOutcome {
                total_lines: 3,
                matched_lines: 1,
            },
            Path::new("/tmp/lines_filtrado.txt"),
        )
        .unwrap();

        assert_eq!(summary.percentage_label(), "33.3%");
        assert_eq!(summary.output_file, "lines_filtrado.txt");
    }

    #[test]
    fn test_zero_total_is_an_error() {
        assert_eq!(percentage(0, 0), None);

        let err = format_summary(0, 0, Path::new("empty_filtrado.txt")).unwrap_err();
        assert!(matches!(err, SynthFilterError::ZeroTotal { .. }));
    }

    #[test]
    fn test_summary_contains_all_data_points() {
        let text = format_summary(12345, 2000, Path::new("big_filtrado.txt")).unwrap();

        assert!(text.contains("12,345"));
        assert!(text.contains("2,000"));
        assert!(text.contains("16.2%"));
        assert!(text.contains("big_filtrado.txt"));
    }
}
