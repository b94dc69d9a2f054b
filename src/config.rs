use crate::error::{Result, SynthFilterError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub spreadsheet: SpreadsheetConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    /// Worksheet holding the identifier column; the first sheet when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Field separator for `.csv` identifier sources.
    pub csv_delimiter: char,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub atomic_write: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub buffer_size: usize,
    pub progress_interval: u64,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            csv_delimiter: ',',
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { atomic_write: true }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024, // 64KB
            progress_interval: 10_000,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SynthFilterError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SynthFilterError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| SynthFilterError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["synthfilter.toml", ".synthfilter.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        log::debug!("using configuration from {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref sheet) = cli_args.sheet {
            self.spreadsheet.sheet = Some(sheet.clone());
        }

        if let Some(delimiter) = cli_args.csv_delimiter {
            self.spreadsheet.csv_delimiter = delimiter;
        }

        if let Some(atomic_write) = cli_args.atomic_write {
            self.output.atomic_write = atomic_write;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.spreadsheet.csv_delimiter.is_ascii() {
            return Err(SynthFilterError::Config {
                message: format!(
                    "CSV delimiter must be a single ASCII character, got '{}'",
                    self.spreadsheet.csv_delimiter
                ),
            });
        }

        if let Some(ref sheet) = self.spreadsheet.sheet {
            if sheet.trim().is_empty() {
                return Err(SynthFilterError::Config {
                    message: "Sheet name must not be empty".to_string(),
                });
            }
        }

        if self.processing.progress_interval == 0 {
            return Err(SynthFilterError::Config {
                message: "Progress interval must be greater than 0".to_string(),
            });
        }

        if self.processing.buffer_size < 4096 {
            return Err(SynthFilterError::Config {
                message: "Buffer size must be at least 4096 bytes".to_string(),
            });
        }

        Ok(())
    }

    /// The CSV delimiter as a byte. Only meaningful after [`Config::validate`].
    pub fn csv_delimiter_byte(&self) -> u8 {
        u8::try_from(self.spreadsheet.csv_delimiter).unwrap_or(b',')
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub sheet: Option<String>,
    pub csv_delimiter: Option<char>,
    pub atomic_write: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_csv_delimiter(mut self, delimiter: Option<char>) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    pub fn with_atomic_write(mut self, atomic_write: Option<bool>) -> Self {
        self.atomic_write = atomic_write;
        self
    }
}
