use super::output::OutputFile;
use super::record;
use crate::error::{Result, SynthFilterError};
use crate::identifiers::IdentifierSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

/// Line counts of a finished filter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOutcome {
    pub total_lines: u64,
    pub matched_lines: u64,
}

#[derive(Debug, Clone)]
pub struct FilterProgress {
    pub lines_read: u64,
    pub lines_matched: u64,
    pub bytes_read: u64,
    pub total_bytes: u64,
    pub start_time: Instant,
}

impl FilterProgress {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            lines_read: 0,
            lines_matched: 0,
            bytes_read: 0,
            total_bytes,
            start_time: Instant::now(),
        }
    }

    fn record_line(&mut self, bytes: u64, matched: bool) {
        self.lines_read += 1;
        self.bytes_read += bytes;
        if matched {
            self.lines_matched += 1;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.bytes_read == 0 || self.bytes_read >= self.total_bytes {
            return Duration::from_secs(0);
        }

        let rate = self.bytes_read as f64 / self.elapsed().as_secs_f64();
        let remaining = (self.total_bytes - self.bytes_read) as f64;

        if rate > 0.0 && rate.is_finite() {
            Duration::from_secs_f64(remaining / rate)
        } else {
            Duration::from_secs(0)
        }
    }

    pub fn outcome(&self) -> FilterOutcome {
        FilterOutcome {
            total_lines: self.lines_read,
            matched_lines: self.lines_matched,
        }
    }
}

/// Streams a text file and keeps the lines whose key field is a known identifier.
pub struct LineFilter {
    atomic_write: bool,
    buffer_size: usize,
    progress_interval: u64,
}

impl LineFilter {
    pub fn new() -> Self {
        Self {
            atomic_write: true,
            buffer_size: 64 * 1024, // 64KB buffer
            progress_interval: 10_000,
        }
    }

    pub fn with_atomic_write(mut self, atomic: bool) -> Self {
        self.atomic_write = atomic;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096); // Minimum 4KB buffer
        self
    }

    pub fn with_progress_interval(mut self, lines: u64) -> Self {
        self.progress_interval = lines.max(1);
        self
    }

    /// Copy every matching line of `input` to `output`, byte for byte and in order.
    ///
    /// `progress_callback` runs every `progress_interval` lines and once at the end.
    /// An error from it aborts the run; nothing is left at `output` in that case.
    pub fn filter(
        &self,
        identifiers: &IdentifierSet,
        input: &Path,
        output: &Path,
        progress_callback: Option<&dyn Fn(&FilterProgress) -> Result<()>>,
    ) -> Result<FilterOutcome> {
        if input == output {
            return Err(SynthFilterError::InvalidPath {
                path: format!("Output would overwrite the input: {}", output.display()),
            });
        }

        let (keys, unrepresentable) = identifiers.latin1_keys();
        if unrepresentable > 0 {
            log::warn!(
                "{} identifiers contain characters outside Latin-1 and cannot match any line",
                unrepresentable
            );
        }

        let file = File::open(input).map_err(|e| SynthFilterError::file_access(input, e))?;
        let total_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);
        let mut reader = BufReader::with_capacity(self.buffer_size, file);

        let mut sink = OutputFile::create(output, self.atomic_write, self.buffer_size)?;
        let mut progress = FilterProgress::new(total_bytes);

        let copied = self.copy_matching(
            &mut reader,
            &mut sink,
            &keys,
            input,
            &mut progress,
            progress_callback,
        );

        match copied {
            Ok(()) => {
                let written = sink.bytes_written();
                sink.commit()?;
                log::debug!(
                    "wrote {} bytes ({} lines) to {}",
                    written,
                    progress.lines_matched,
                    output.display()
                );
                Ok(progress.outcome())
            }
            Err(e) => {
                if let Err(cleanup) = sink.discard() {
                    log::warn!("could not remove partial output: {}", cleanup);
                }
                Err(e)
            }
        }
    }

    fn copy_matching<R: BufRead>(
        &self,
        reader: &mut R,
        sink: &mut OutputFile,
        keys: &HashSet<Vec<u8>>,
        input: &Path,
        progress: &mut FilterProgress,
        progress_callback: Option<&dyn Fn(&FilterProgress) -> Result<()>>,
    ) -> Result<()> {
        let mut line = Vec::with_capacity(256);

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| SynthFilterError::file_access(input, e))?;
            if read == 0 {
                break;
            }

            let matched = record::key_field(&line).is_some_and(|key| keys.contains(key));
            if matched {
                sink.write_line(&line)?;
            }
            progress.record_line(read as u64, matched);

            if progress.lines_read % self.progress_interval == 0 {
                if let Some(callback) = progress_callback {
                    callback(progress)?;
                }
            }
        }

        // Final progress update
        if let Some(callback) = progress_callback {
            callback(progress)?;
        }

        Ok(())
    }
}

impl Default for LineFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter `input` into `output` with default settings.
pub fn filter_file(
    identifiers: &IdentifierSet,
    input: &Path,
    output: &Path,
) -> Result<FilterOutcome> {
    LineFilter::new().filter(identifiers, input, output, None)
}
