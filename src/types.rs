use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::fmt;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Storage type of a column, inferred from its observed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    DateTime,
    Text,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::DateTime => "datetime",
            ColumnType::Text => "text",
        }
    }

    /// Text that identifies `raw` as a value of this type.
    ///
    /// Two cells holding the same typed value (`01` and `1` in an integer
    /// column, `TRUE` and `true` in a boolean one) map to the same key.
    pub fn canonical<'a>(self, raw: &'a str) -> Cow<'a, str> {
        match self {
            ColumnType::Integer => match raw.trim().parse::<i64>() {
                Ok(v) => Cow::Owned(v.to_string()),
                Err(_) => Cow::Borrowed(raw),
            },
            ColumnType::Float => match raw.trim().parse::<f64>() {
                // -0.0 and 0.0 are the same value
                Ok(v) if v == 0.0 => Cow::Borrowed("0"),
                Ok(v) => Cow::Owned(v.to_string()),
                Err(_) => Cow::Borrowed(raw),
            },
            ColumnType::Boolean => Cow::Owned(raw.trim().to_lowercase()),
            ColumnType::DateTime | ColumnType::Text => Cow::Borrowed(raw),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parses_as_datetime(val: &str) -> bool {
    NaiveDate::parse_from_str(val, "%Y-%m-%d").is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(val, format).is_ok())
        || DateTime::parse_from_rfc3339(val).is_ok()
}

/// Infers the type of column `col_idx`. Missing cells are skipped; a column
/// with no observed values is typed as float, like an all-NaN column.
pub fn infer_type(rows: &[Vec<Option<String>>], col_idx: usize) -> ColumnType {
    let mut is_int = true;
    let mut is_float = true;
    let mut is_bool = true;
    let mut is_datetime = true;
    let mut seen = false;

    for val in rows
        .iter()
        .filter_map(|row| row.get(col_idx).and_then(Option::as_deref))
    {
        seen = true;
        let trimmed = val.trim();
        if is_int && trimmed.parse::<i64>().is_err() {
            is_int = false;
        }
        if is_float && trimmed.parse::<f64>().is_err() {
            is_float = false;
        }
        if is_bool && !matches!(trimmed.to_lowercase().as_str(), "true" | "false") {
            is_bool = false;
        }
        if is_datetime && !parses_as_datetime(trimmed) {
            is_datetime = false;
        }
        if !is_int && !is_float && !is_bool && !is_datetime {
            return ColumnType::Text;
        }
    }

    if !seen {
        ColumnType::Float
    } else if is_int {
        ColumnType::Integer
    } else if is_float {
        ColumnType::Float
    } else if is_bool {
        ColumnType::Boolean
    } else if is_datetime {
        ColumnType::DateTime
    } else {
        ColumnType::Text
    }
}
