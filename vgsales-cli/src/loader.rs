//! File-backed record sources for the engine.
//!
//! Two layouts are understood: the `vgsales.csv` export (columns located by
//! header name, `N/A` or empty cells read as absent) and a JSON array of raw
//! records keyed by the same column names.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use vgsales_engine::numbers::year_from_f64;
use vgsales_engine::{RawRecord, RecordSource};

use crate::util::split_csv_record;

/// Columns every CSV dataset must carry. `Rank` and unknown columns are ignored.
const REQUIRED_COLUMNS: [&str; 10] = [
    "Name",
    "Platform",
    "Year",
    "Genre",
    "Publisher",
    "NA_Sales",
    "EU_Sales",
    "JP_Sales",
    "Other_Sales",
    "Global_Sales",
];

/// Marker used by the source export for unknown values.
const ABSENT_MARKER: &str = "N/A";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV header is missing column `{0}`")]
    MissingColumn(&'static str),
    #[error("CSV line {line}: {message}")]
    Row { line: usize, message: String },
    #[error("dataset has no header row")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    /// Pick a format from the file extension; anything but `.json` is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Record source reading a dataset file from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: DataFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = DataFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub const fn format(&self) -> DataFormat {
        self.format
    }
}

impl RecordSource for FileSource {
    type Error = LoadError;

    fn load_records(&self) -> Result<Vec<RawRecord>, Self::Error> {
        let path = self.path();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records = match self.format() {
            DataFormat::Csv => parse_csv(&text)?,
            DataFormat::Json => serde_json::from_str(&text)?,
        };
        log::info!(
            "read {} raw records from {} ({:?})",
            records.len(),
            path.display(),
            self.format()
        );
        Ok(records)
    }
}

/// Parse a `vgsales.csv`-style document into raw records.
///
/// Line numbers in errors are 1-based and count the header.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines.next().ok_or(LoadError::Empty)?;
    let header = header.trim_start_matches('\u{feff}');
    let names = split_csv_record(header).ok_or_else(|| LoadError::Row {
        line: header_line,
        message: "unterminated quote in header".to_string(),
    })?;
    let columns = ColumnIndex::from_header(&names)?;

    lines
        .map(|(line, content)| {
            let cells = split_csv_record(content).ok_or_else(|| LoadError::Row {
                line,
                message: "unterminated quote".to_string(),
            })?;
            if cells.len() != names.len() {
                return Err(LoadError::Row {
                    line,
                    message: format!("expected {} cells, found {}", names.len(), cells.len()),
                });
            }
            columns.read(&cells, line)
        })
        .collect()
}

struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_header(names: &[String]) -> Result<Self, LoadError> {
        let mut positions = HashMap::new();
        for column in REQUIRED_COLUMNS {
            let idx = names
                .iter()
                .position(|n| n.trim() == column)
                .ok_or(LoadError::MissingColumn(column))?;
            positions.insert(column, idx);
        }
        Ok(Self { positions })
    }

    fn cell<'c>(&self, cells: &'c [String], column: &'static str) -> Option<&'c str> {
        let raw = cells.get(*self.positions.get(column)?)?.trim();
        (!raw.is_empty() && raw != ABSENT_MARKER).then_some(raw)
    }

    fn text(&self, cells: &[String], column: &'static str) -> Option<String> {
        self.cell(cells, column).map(str::to_string)
    }

    fn number(
        &self,
        cells: &[String],
        column: &'static str,
        line: usize,
    ) -> Result<Option<f64>, LoadError> {
        self.cell(cells, column)
            .map(|raw| {
                raw.parse::<f64>().map_err(|_| LoadError::Row {
                    line,
                    message: format!("`{column}` is not a number: {raw}"),
                })
            })
            .transpose()
    }

    fn read(&self, cells: &[String], line: usize) -> Result<RawRecord, LoadError> {
        let year = self
            .number(cells, "Year", line)?
            .map(|value| {
                year_from_f64(value).ok_or_else(|| LoadError::Row {
                    line,
                    message: format!("`Year` is not a whole year: {value}"),
                })
            })
            .transpose()?;

        Ok(RawRecord {
            name: self.text(cells, "Name"),
            platform: self.text(cells, "Platform"),
            year,
            genre: self.text(cells, "Genre"),
            publisher: self.text(cells, "Publisher"),
            na_sales: self.number(cells, "NA_Sales", line)?,
            eu_sales: self.number(cells, "EU_Sales", line)?,
            jp_sales: self.number(cells, "JP_Sales", line)?,
            other_sales: self.number(cells, "Other_Sales", line)?,
            global_sales: self.number(cells, "Global_Sales", line)?,
        })
    }
}
