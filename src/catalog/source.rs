//! Tabular input for the catalog loader
//!
//! A source yields header-keyed rows. Empty cells never appear as keys and
//! rows without any value are dropped, so the loader only has to deal with
//! "present" and "absent".

use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CatalogError;

/// A single non-empty spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Numeric value of the cell, or `None` when it does not hold a finite number.
    ///
    /// Text is parsed after trimming so `" 30.5 "` reads as `30.5`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        };
        value.is_finite().then_some(value)
    }

    /// Text rendering of the cell. Integral numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One data row keyed by header name
pub type SourceRow = HashMap<String, Cell>;

/// Anything that can produce header-keyed rows for the loader
pub trait TabularSource: Send + Sync {
    /// Read every data row, in source order
    fn rows(&self) -> Result<Vec<SourceRow>, CatalogError>;

    /// Human-readable origin, used in logs
    fn describe(&self) -> String;
}

/// Reads the first worksheet of a workbook (xlsx, xls, xlsb or ods)
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSource for XlsxSource {
    fn rows(&self) -> Result<Vec<SourceRow>, CatalogError> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| CatalogError::Open {
            path: self.path.clone(),
            source: e,
        })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CatalogError::NoSheet {
                path: self.path.clone(),
            })?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| CatalogError::Sheet {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let mut raw_rows = range.rows();
        let headers: Vec<Option<String>> = match raw_rows.next() {
            Some(header_row) => header_row.iter().map(header_name).collect(),
            None => return Ok(Vec::new()),
        };

        let rows = records_from_rows(&headers, raw_rows.map(|r| r.iter().map(cell_from_data)));

        debug!(
            path = %self.path.display(),
            sheet = %sheet_name,
            rows = rows.len(),
            "Read worksheet"
        );
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn header_name(data: &Data) -> Option<String> {
    cell_from_data(data)
        .map(|c| c.as_text().trim().to_string())
        .filter(|h| !h.is_empty())
}

fn cell_from_data(data: &Data) -> Option<Cell> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Int(i) => Some(Cell::Number(*i as f64)),
        Data::Float(f) => Some(Cell::Number(*f)),
        Data::Bool(b) => Some(Cell::Bool(*b)),
        Data::DateTime(dt) => Some(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Cell::Text(s.clone())),
    }
}

/// Zip data rows with the header row.
///
/// Columns without a header are ignored; a repeated header keeps its first
/// column. Rows that end up with no cells are dropped.
fn records_from_rows<R, C>(headers: &[Option<String>], rows: R) -> Vec<SourceRow>
where
    R: Iterator<Item = C>,
    C: Iterator<Item = Option<Cell>>,
{
    rows.filter_map(|cells| {
        let mut record = SourceRow::new();
        for (header, cell) in headers.iter().zip(cells) {
            if let (Some(header), Some(cell)) = (header, cell) {
                record.entry(header.clone()).or_insert(cell);
            }
        }
        (!record.is_empty()).then_some(record)
    })
    .collect()
}

/// Rows held in memory. Used for fakes and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<SourceRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<SourceRow>) -> Self {
        Self { rows }
    }

    /// Build a source from `(header, cell)` pairs per row
    pub fn from_pairs<'a, I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (&'a str, Cell)>,
    {
        Self::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
                .collect(),
        )
    }
}

impl TabularSource for MemorySource {
    fn rows(&self) -> Result<Vec<SourceRow>, CatalogError> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} rows)", self.rows.len())
    }
}
