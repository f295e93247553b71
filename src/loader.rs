use crate::{CardError, Dataset};
use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Cell texts read as missing unless the loader is told otherwise.
pub const DEFAULT_NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Turns a file into a [`Dataset`].
pub trait DatasetLoader {
    fn load(&self, path: &Path) -> Result<Dataset, CardError>;
}

/// Reads delimited text with a header row.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    na_values: HashSet<String>,
}

impl Default for CsvLoader {
    fn default() -> Self {
        CsvLoader {
            delimiter: b',',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Adds a token that reads as a missing value.
    pub fn with_na_value(mut self, token: impl Into<String>) -> Self {
        self.na_values.insert(token.into());
        self
    }

    fn is_missing(&self, field: &str) -> bool {
        self.na_values.contains(field)
    }

    /// Parses CSV from any reader. The first record is the header.
    pub fn read<R: io::Read>(&self, reader: R) -> Result<Dataset, CardError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        let mut padded = 0usize;
        for record in rdr.records() {
            let record = record?;
            if record.len() > width {
                return Err(CardError::RaggedRow {
                    line: record.position().map_or(0, |pos| pos.line()),
                    expected: width,
                    found: record.len(),
                });
            }
            if record.len() < width {
                padded += 1;
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|field| (!self.is_missing(field)).then(|| field.to_string()))
                .collect();
            row.resize(width, None);
            rows.push(row);
        }

        if padded > 0 {
            warn!(rows = padded, "short rows padded with missing values");
        }
        debug!(rows = rows.len(), columns = width, "parsed CSV");
        Ok(Dataset::new(headers, rows))
    }
}

impl DatasetLoader for CsvLoader {
    fn load(&self, path: &Path) -> Result<Dataset, CardError> {
        let file = File::open(path).map_err(|source| CardError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.read(io::BufReader::new(file))
    }
}
