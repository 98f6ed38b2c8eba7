//! Flat CSV stores: one header row plus data rows per file
//!
//! A store keeps cells as plain strings and never interprets them. Columns
//! are append-only: [`CsvStore::ensure_column`] adds a trailing column and
//! pads every existing row, but nothing ever reorders or removes one.

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Column holding the part number; the join key across stores
pub const IPN_COLUMN: &str = "IPN";

/// Schema used when a directory holds no usable stores
pub const DEFAULT_HEADERS: &[&str] = &[
    "IPN",
    "Description",
    "Footprint",
    "Value",
    "Manufacturer",
    "MPN",
    "Datasheet",
    "Priority",
    "Checked",
];

/// Name of the store synthesized for an empty directory
pub const BLANK_STORE_NAME: &str = "partmaster";

/// Errors raised while reading or writing a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Decoded CSV content
pub type Table = (Vec<String>, Vec<Vec<String>>);

/// Decode CSV bytes into headers and rows
///
/// Rows may be shorter than the header. Trailing empty cells beyond the
/// header width are dropped; any other overflow is a parse error.
pub fn decode(bytes: &[u8]) -> Result<Table, String> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| e.to_string())?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        while row.len() > headers.len() && row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
        if row.len() > headers.len() {
            return Err(format!(
                "row {} has {} cells but the header has {} columns",
                idx + 2,
                row.len(),
                headers.len()
            ));
        }
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Encode headers and rows as CSV bytes
///
/// Rows with no cells are skipped; they carry no data and could not be
/// told apart from a row holding one empty cell when read back.
pub fn encode(headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>, String> {
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    wtr.write_record(headers).map_err(|e| e.to_string())?;
    for row in rows.iter().filter(|r| !r.is_empty()) {
        wtr.write_record(row).map_err(|e| e.to_string())?;
    }
    wtr.into_inner().map_err(|e| e.to_string())
}

/// List the `*.csv` files directly inside `dir`, sorted by path
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let message = e.to_string();
            StoreError::io(dir, e.into_io_error().unwrap_or_else(|| std::io::Error::other(message)))
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// One CSV file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvStore {
    path: PathBuf,
    name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvStore {
    /// Create an in-memory store for `path` with the given headers and no rows
    pub fn new(path: impl Into<PathBuf>, headers: Vec<String>) -> Self {
        let path = path.into();
        let name = store_name(&path);
        Self {
            path,
            name,
            headers,
            rows: Vec::new(),
        }
    }

    /// Blank store with the default schema, located in `dir`
    pub fn blank(dir: &Path) -> Self {
        Self::new(
            dir.join(format!("{}.csv", BLANK_STORE_NAME)),
            DEFAULT_HEADERS.iter().map(|h| h.to_string()).collect(),
        )
    }

    /// Read a store from disk
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        let (headers, rows) = decode(&bytes).map_err(|m| StoreError::parse(path, m))?;
        debug!(path = %path.display(), columns = headers.len(), rows = rows.len(), "loaded store");

        let mut store = Self::new(path, headers);
        store.rows = rows;
        Ok(store)
    }

    /// Read every store in a directory (non-recursive)
    pub fn load_all(dir: &Path) -> Result<Vec<Self>, StoreError> {
        list_csv_files(dir)?
            .iter()
            .map(|path| Self::load(path))
            .collect()
    }

    /// Write the store back to its file
    pub fn save(&self) -> Result<(), StoreError> {
        let bytes = encode(&self.headers, &self.rows).map_err(|m| StoreError::parse(&self.path, m))?;
        fs::write(&self.path, bytes).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), rows = self.rows.len(), "saved store");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File stem, e.g. `cap` for `cap.csv`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the column with exactly this header
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, appending it as a new trailing column if missing
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.find_column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        let width = self.headers.len();
        for row in &mut self.rows {
            if row.len() < width {
                row.push(String::new());
            }
        }
        width - 1
    }

    /// Cell at `row`/`col`, treating cells past the row end as missing
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }

    /// Identity value of a row, if the store has an IPN column and the row reaches it
    pub fn ipn_at(&self, row: usize) -> Option<&str> {
        self.find_column(IPN_COLUMN).and_then(|col| self.cell(row, col))
    }

    /// Index of the first row whose identity value equals `ipn`
    pub fn find_row(&self, ipn: &str) -> Option<usize> {
        let col = self.find_column(IPN_COLUMN)?;
        self.rows
            .iter()
            .position(|row| row.get(col).is_some_and(|c| c == ipn))
    }

    /// Pad a row to the full header width
    pub fn pad_row(&mut self, row: usize) {
        let width = self.headers.len();
        if let Some(r) = self.rows.get_mut(row) {
            if r.len() < width {
                r.resize(width, String::new());
            }
        }
    }
}

fn store_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
