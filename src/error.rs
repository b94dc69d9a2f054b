use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthFilterError {
    #[error("Missing required input: {}", .missing.join(", "))]
    MissingInput { missing: Vec<String> },

    #[error("Column '{column}' not found in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("Cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read spreadsheet {}: {message}", .path.display())]
    Spreadsheet { path: PathBuf, message: String },

    #[error("No lines were read; percentage is undefined (output: {})", .output.display())]
    ZeroTotal { output: PathBuf },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl SynthFilterError {
    pub fn file_access(path: &Path, source: std::io::Error) -> Self {
        SynthFilterError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn spreadsheet(path: &Path, message: impl Display) -> Self {
        SynthFilterError::Spreadsheet {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for SynthFilterError {
    fn user_message(&self) -> String {
        match self {
            SynthFilterError::MissingInput { missing } => {
                format!(
                    "Please select both files before continuing (missing: {})",
                    missing.join(", ")
                )
            }
            SynthFilterError::MissingColumn { column, path } => {
                format!(
                    "Column '{}' was not found in {}",
                    column,
                    file_label(path)
                )
            }
            SynthFilterError::FileAccess { path, source } => {
                format!("Could not read or write {}: {}", file_label(path), source)
            }
            SynthFilterError::Spreadsheet { path, message } => {
                format!("Could not parse spreadsheet {}: {}", file_label(path), message)
            }
            SynthFilterError::ZeroTotal { output } => {
                format!(
                    "The text file contains no lines, so no percentage can be computed ({} is empty)",
                    file_label(output)
                )
            }
            SynthFilterError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            SynthFilterError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            SynthFilterError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            SynthFilterError::MissingInput { .. } => Some(
                "Pass the spreadsheet with --spreadsheet and the text file with --input (or set SYNTHFILTER_SPREADSHEET / SYNTHFILTER_INPUT).".to_string()
            ),
            SynthFilterError::MissingColumn { column, .. } => Some(format!(
                "Check that the first row of the sheet has a header named exactly '{}'. Use --sheet if the column lives on another worksheet.",
                column
            )),
            SynthFilterError::FileAccess { .. } => Some(
                "Verify the file exists and that you have read permission on the inputs and write permission on the input's directory.".to_string()
            ),
            SynthFilterError::Spreadsheet { .. } => Some(
                "Make sure the file is a valid .xlsx, .xls, .xlsb, .ods or .csv file and is not open in another program.".to_string()
            ),
            SynthFilterError::ZeroTotal { .. } => Some(
                "Select a text file that contains at least one line.".to_string()
            ),
            SynthFilterError::Config { .. } => Some(
                "Check your configuration file syntax or regenerate one with --generate-config.".to_string()
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SynthFilterError>;

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
