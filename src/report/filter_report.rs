use super::summary::Summary;
use crate::error::{Result, SynthFilterError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything known about a successful run, serialized for `--output-format json` and `--report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    pub spreadsheet: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub identifiers_loaded: usize,
    pub summary: Summary,
    pub duration_ms: u64,
    pub completed_at: DateTime<Utc>,
}

impl FilterReport {
    pub fn new(
        spreadsheet: &Path,
        input: &Path,
        output: &Path,
        identifiers_loaded: usize,
        summary: Summary,
        duration: Duration,
    ) -> Self {
        Self {
            spreadsheet: spreadsheet.to_path_buf(),
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            identifiers_loaded,
            summary,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            completed_at: Utc::now(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| SynthFilterError::Config {
            message: format!("Failed to serialize report to JSON: {}", e),
        })
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json_content = self.to_json()?;
        fs::write(path, json_content).map_err(|e| SynthFilterError::file_access(path, e))?;
        Ok(())
    }
}
