use crate::error::{Result, SynthFilterError};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Inserted between the input's stem and its extension to name the output.
pub const OUTPUT_SUFFIX: &str = "_filtrado";

/// `<base>_filtrado<ext>` for an input `<base><ext>`, in the same directory.
pub fn filtered_output_path(input: &Path) -> Result<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| SynthFilterError::InvalidPath {
        path: format!("Input has no file name: {}", input.display()),
    })?;

    let mut name = OsString::from(stem);
    name.push(OUTPUT_SUFFIX);
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }

    Ok(input.with_file_name(name))
}

enum Target {
    /// Temp file in the destination directory, renamed over the output on commit.
    Staged(NamedTempFile),
    /// The output file itself, removed if the run does not commit.
    Direct(File),
}

impl Write for Target {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Target::Staged(file) => file.write(buf),
            Target::Direct(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Target::Staged(file) => file.flush(),
            Target::Direct(file) => file.flush(),
        }
    }
}

/// Output file that either becomes complete on [`OutputFile::commit`] or leaves nothing behind.
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<Target>,
    bytes_written: u64,
}

impl OutputFile {
    pub fn create(path: &Path, atomic: bool, buffer_size: usize) -> Result<Self> {
        let target = if atomic {
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let staged = tempfile::Builder::new()
                .prefix(".synthfilter-")
                .suffix(".tmp")
                .tempfile_in(directory)
                .map_err(|e| SynthFilterError::file_access(path, e))?;
            Target::Staged(staged)
        } else {
            let file = File::create(path).map_err(|e| SynthFilterError::file_access(path, e))?;
            Target::Direct(file)
        };

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::with_capacity(buffer_size, target),
            bytes_written: 0,
        })
    }

    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.writer
            .write_all(line)
            .map_err(|e| SynthFilterError::file_access(&self.path, e))?;
        self.bytes_written += line.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flush everything and make the output visible at its final path.
    pub fn commit(self) -> Result<PathBuf> {
        let path = self.path;
        let target = self
            .writer
            .into_inner()
            .map_err(|e| SynthFilterError::file_access(&path, e.into_error()))?;

        match target {
            Target::Staged(staged) => {
                staged
                    .as_file()
                    .sync_all()
                    .map_err(|e| SynthFilterError::file_access(&path, e))?;
                staged
                    .persist(&path)
                    .map_err(|e| SynthFilterError::file_access(&path, e.error))?;
            }
            Target::Direct(file) => {
                file.sync_all()
                    .map_err(|e| SynthFilterError::file_access(&path, e))?;
            }
        }

        Ok(path)
    }

    /// Drop buffered data and remove anything written so far.
    pub fn discard(self) -> Result<()> {
        let (target, _unflushed) = self.writer.into_parts();
        match target {
            Target::Staged(staged) => staged
                .close()
                .map_err(|e| SynthFilterError::file_access(&self.path, e)),
            Target::Direct(file) => {
                drop(file);
                match fs::remove_file(&self.path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(SynthFilterError::file_access(&self.path, e)),
                }
            }
        }
    }
}
