//! Tabular batch types for the encoding pipeline.
//!
//! - [`RawFrame`] — a named-column table of string cells, the plain-data
//!   handoff format between ingestion (CSV, upload handler, etc.) and the
//!   core transformation logic.
//! - [`FeatureMatrix`] — the dense numeric output fed into a model, with a
//!   fixed column order identical to the training-time order.
//!
//! Frames are never mutated in place: every transformation is a pure
//! function from a borrowed frame to a new value.

use crate::error::PipelineError;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A rectangular table of string cells with named columns.
///
/// Row-major storage; all rows have exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawFrame {
    /// Create a frame from column names and rows.
    ///
    /// # Errors
    /// Returns [`PipelineError::EmptyData`] if no columns are given and
    /// [`PipelineError::Schema`] if any row width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, PipelineError> {
        if columns.is_empty() {
            return Err(PipelineError::EmptyData(
                "frame requires at least one column".to_string(),
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(PipelineError::Schema(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Read a frame from CSV data with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, PipelineError> {
        let mut rdr = ReaderBuilder::new().from_reader(reader);

        let columns: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Self::new(columns, rows)
    }

    /// Read a frame from a CSV file with a header row.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column with the given name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, in row order.
    ///
    /// # Errors
    /// Returns [`PipelineError::Schema`] if the column does not exist.
    pub fn column_values(&self, name: &str) -> Result<Vec<&str>, PipelineError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PipelineError::Schema(format!("column '{}' absent from frame", name)))?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// One row of cells.
    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// A new frame without the named columns. Columns absent from the
    /// frame are skipped silently, so pruning an id column is a no-op
    /// when the batch never carried one.
    pub fn without_columns(&self, names: &[&str]) -> RawFrame {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !names.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();

        RawFrame {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// A new frame keeping only the rows at the given indices.
    pub fn select_rows(&self, indices: &[usize]) -> RawFrame {
        RawFrame {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

/// A dense numeric feature matrix with a fixed, named column order.
///
/// The column order is established at training time and must be identical
/// at serving time; any drop or reorder breaks the alignment with the
/// model's learned weights.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self { columns, rows }
    }

    /// Column names, in the training-time order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// `(n_rows, n_columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One feature row.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Whether every cell is finite (no NaN/Inf). Matrices produced by the
    /// transformer satisfy this; the check exists for diagnostics.
    pub fn is_dense(&self) -> bool {
        self.rows.iter().flatten().all(|v| v.is_finite())
    }
}
