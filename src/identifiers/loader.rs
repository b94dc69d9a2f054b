use super::identifier_set::{IdentifierSet, IDENTIFIER_COLUMN};
use crate::codec;
use crate::error::{Result, SynthFilterError};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

/// Read the `SINTETICOS` column of a spreadsheet using default settings.
pub fn load_identifiers(path: &Path) -> Result<IdentifierSet> {
    IdentifierLoader::new().load(path)
}

/// Reads identifiers from a workbook (`calamine`) or a `.csv` file.
pub struct IdentifierLoader {
    sheet: Option<String>,
    csv_delimiter: u8,
}

impl IdentifierLoader {
    pub fn new() -> Self {
        Self {
            sheet: None,
            csv_delimiter: b',',
        }
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_csv_delimiter(mut self, delimiter: u8) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    pub fn load(&self, path: &Path) -> Result<IdentifierSet> {
        // calamine reports a missing file as a parse error; surface it as an I/O failure instead.
        std::fs::metadata(path).map_err(|e| SynthFilterError::file_access(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let identifiers = match extension.as_str() {
            "csv" => self.load_delimited(path)?,
            _ => self.load_workbook(path)?,
        };

        log::debug!(
            "loaded {} identifiers from {}",
            identifiers.len(),
            path.display()
        );

        Ok(identifiers)
    }

    fn load_workbook(&self, path: &Path) -> Result<IdentifierSet> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| SynthFilterError::spreadsheet(path, e))?;

        let range: Range<Data> = match self.sheet {
            Some(ref name) => workbook
                .worksheet_range(name)
                .map_err(|e| SynthFilterError::spreadsheet(path, e))?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| SynthFilterError::spreadsheet(path, "workbook has no worksheets"))?
                .map_err(|e| SynthFilterError::spreadsheet(path, e))?,
        };

        let mut rows = range.rows();
        let column = rows
            .next()
            .and_then(|header| {
                header
                    .iter()
                    .position(|cell| matches!(cell, Data::String(s) if s == IDENTIFIER_COLUMN))
            })
            .ok_or_else(|| missing_column(path))?;

        let mut identifiers = IdentifierSet::new();
        for row in rows {
            if let Some(text) = row.get(column).and_then(cell_text) {
                identifiers.insert_raw(&text);
            }
        }

        Ok(identifiers)
    }

    fn load_delimited(&self, path: &Path) -> Result<IdentifierSet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.csv_delimiter)
            .flexible(true)
            .has_headers(true)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;

        let headers = reader
            .byte_headers()
            .map_err(|e| csv_error(path, e))?
            .clone();

        let column = headers
            .iter()
            .position(|header| {
                codec::decode_text(header).trim_start_matches(UTF8_BOM) == IDENTIFIER_COLUMN
            })
            .ok_or_else(|| missing_column(path))?;

        let mut identifiers = IdentifierSet::new();
        for record in reader.byte_records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            if let Some(field) = record.get(column) {
                identifiers.insert_raw(&codec::decode_text(field));
            }
        }

        Ok(identifiers)
    }
}

impl Default for IdentifierLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of a cell as it would be typed, or `None` for missing values.
///
/// Integral floats drop their fractional part so `7.0` reads as `7`; text cells
/// are never coerced, so `007` stays `007`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(true) => Some("True".to_string()),
        Data::Bool(false) => Some("False".to_string()),
        other => Some(other.to_string()),
    }
}

fn missing_column(path: &Path) -> SynthFilterError {
    SynthFilterError::MissingColumn {
        column: IDENTIFIER_COLUMN.to_string(),
        path: path.to_path_buf(),
    }
}

fn csv_error(path: &Path, error: csv::Error) -> SynthFilterError {
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(source) => SynthFilterError::file_access(path, source),
        _ => SynthFilterError::spreadsheet(path, message),
    }
}
