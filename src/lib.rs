//! Build an "ID card" for a tabular dataset: shape, column names, missing
//! values and column types, optionally with distinct counts and value
//! frequencies, rendered as fixed-width text blocks.
//!
//! The pipeline is `load -> collect -> report`. [`run`] wires the three
//! together with an injected [`DatasetLoader`] and output sink.

mod loader;
pub mod logging;
mod report;
mod summary;
mod types;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub use loader::{CsvLoader, DEFAULT_NA_VALUES, DatasetLoader};
pub use report::{DEFAULT_FRAME_WIDTH, ReportOptions, group_thousands, render, report};
pub use summary::{ColumnSummary, DatasetSummary, SummaryOptions, ValueCount, collect};
pub use types::{ColumnType, infer_type};

#[derive(Debug, Error)]
pub enum CardError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// An in-memory table: named columns, ordered rows, one inferred type per
/// column. A `None` cell is a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    column_types: Vec<ColumnType>,
}

impl Dataset {
    /// Builds a dataset and infers each column's type. Rows shorter than
    /// `headers` read as missing in their trailing columns.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let column_types = (0..headers.len())
            .map(|col_idx| infer_type(&rows, col_idx))
            .collect();
        Dataset {
            headers,
            rows,
            column_types,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn column_type(&self, col_idx: usize) -> Option<ColumnType> {
        self.column_types.get(col_idx).copied()
    }

    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&str> {
        self.rows
            .get(row_idx)
            .and_then(|row| row.get(col_idx))
            .and_then(Option::as_deref)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col_idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(col_idx).and_then(Option::as_deref))
    }
}

/// Everything a run needs besides the input path.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub summary: SummaryOptions,
    pub report: ReportOptions,
}

/// Loads `path` with `loader`, summarizes it and writes the report to `out`.
pub fn run<L, W>(
    loader: &L,
    path: &Path,
    config: &Config,
    out: &mut W,
) -> Result<DatasetSummary, CardError>
where
    L: DatasetLoader + ?Sized,
    W: Write,
{
    let dataset = loader.load(path)?;
    info!(
        path = %path.display(),
        rows = dataset.num_rows(),
        columns = dataset.num_columns(),
        "loaded dataset"
    );
    let summary = collect(&dataset, &config.summary);
    report(&summary, &config.report, out)?;
    out.flush()?;
    Ok(summary)
}
