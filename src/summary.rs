use crate::{ColumnType, Dataset};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Which optional facets [`collect`] computes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SummaryOptions {
    pub include_distinct_counts: bool,
    pub include_value_frequencies: bool,
}

impl SummaryOptions {
    /// Both optional facets on.
    pub fn extended() -> Self {
        SummaryOptions {
            include_distinct_counts: true,
            include_value_frequencies: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub missing: usize,
    pub data_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequencies: Option<Vec<ValueCount>>,
}

/// What [`collect`] found in a dataset. Columns keep source order, so every
/// per-column facet is keyed by exactly the column names, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DatasetSummary {
    rows: usize,
    columns: Vec<ColumnSummary>,
    #[serde(skip)]
    facets: SummaryOptions,
}

impl DatasetSummary {
    /// `(row_count, column_count)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns.len())
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnSummary] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn missing_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.missing))
            .collect()
    }

    pub fn data_types(&self) -> Vec<(&str, ColumnType)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type))
            .collect()
    }

    /// `None` unless distinct counts were collected.
    pub fn distinct_counts(&self) -> Option<Vec<(&str, usize)>> {
        if !self.facets.include_distinct_counts {
            return None;
        }
        self.columns
            .iter()
            .map(|c| c.distinct.map(|n| (c.name.as_str(), n)))
            .collect()
    }

    /// `None` unless frequency tables were collected.
    pub fn value_frequencies(&self) -> Option<Vec<(&str, &[ValueCount])>> {
        if !self.facets.include_value_frequencies {
            return None;
        }
        self.columns
            .iter()
            .map(|c| c.frequencies.as_deref().map(|f| (c.name.as_str(), f)))
            .collect()
    }

    pub fn has_distinct_counts(&self) -> bool {
        self.facets.include_distinct_counts
    }

    pub fn has_value_frequencies(&self) -> bool {
        self.facets.include_value_frequencies
    }
}

/// Counts each distinct value of a column, most frequent first. Equal counts
/// keep the order in which the values were first seen.
fn value_counts<'a>(
    cells: impl Iterator<Item = Option<&'a str>>,
    data_type: ColumnType,
) -> Vec<ValueCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for raw in cells.flatten() {
        let key = data_type.canonical(raw).into_owned();
        match index.get(&key) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push(ValueCount {
                    value: key,
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn distinct_count<'a>(cells: impl Iterator<Item = Option<&'a str>>, data_type: ColumnType) -> usize {
    let distinct: HashSet<_> = cells.flatten().map(|raw| data_type.canonical(raw)).collect();
    distinct.len()
}

/// Summarizes `dataset`. Never fails: an empty dataset gives zero counts.
pub fn collect(dataset: &Dataset, options: &SummaryOptions) -> DatasetSummary {
    let columns: Vec<ColumnSummary> = dataset
        .headers()
        .iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let data_type = dataset.column_type(col_idx).unwrap_or(ColumnType::Float);
            let missing = dataset.column(col_idx).filter(Option::is_none).count();
            let distinct = options
                .include_distinct_counts
                .then(|| distinct_count(dataset.column(col_idx), data_type));
            let frequencies = options
                .include_value_frequencies
                .then(|| value_counts(dataset.column(col_idx), data_type));
            debug!(column = %name, %data_type, missing, ?distinct, "collected column");
            ColumnSummary {
                name: name.clone(),
                missing,
                data_type,
                distinct,
                frequencies,
            }
        })
        .collect();

    info!(
        rows = dataset.num_rows(),
        columns = columns.len(),
        "summarized dataset"
    );
    DatasetSummary {
        rows: dataset.num_rows(),
        columns,
        facets: *options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(headers: &[&str], rows: &[&[Option<&str>]]) -> Dataset {
        Dataset::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.map(String::from)).collect())
                .collect(),
        )
    }

    fn sample() -> Dataset {
        dataset(
            &["a", "b"],
            &[
                &[Some("1"), Some("2")],
                &[None, Some("4")],
                &[Some("5"), Some("6")],
            ],
        )
    }

    fn assert_facets_match_columns(summary: &DatasetSummary) {
        let names = summary.column_names();
        assert_eq!(summary.dimensions().1, names.len());
        let missing: Vec<&str> = summary.missing_counts().iter().map(|e| e.0).collect();
        let types: Vec<&str> = summary.data_types().iter().map(|e| e.0).collect();
        assert_eq!(missing, names);
        assert_eq!(types, names);
        if let Some(distinct) = summary.distinct_counts() {
            assert_eq!(distinct.iter().map(|e| e.0).collect::<Vec<_>>(), names);
        }
        if let Some(freqs) = summary.value_frequencies() {
            assert_eq!(freqs.iter().map(|e| e.0).collect::<Vec<_>>(), names);
        }
        for column in summary.columns() {
            assert!(column.missing <= summary.row_count());
            let observed = summary.row_count() - column.missing;
            if let Some(distinct) = column.distinct {
                assert!(distinct <= observed);
            }
            if let Some(freqs) = &column.frequencies {
                assert_eq!(freqs.iter().map(|f| f.count).sum::<usize>(), observed);
            }
        }
    }

    #[test]
    fn test_sample() {
        let summary = collect(&sample(), &SummaryOptions::extended());
        assert_eq!(summary.dimensions(), (3, 2));
        assert_eq!(summary.column_names(), vec!["a", "b"]);
        assert_eq!(summary.missing_counts(), vec![("a", 1), ("b", 0)]);
        assert_eq!(summary.distinct_counts(), Some(vec![("a", 2), ("b", 3)]));
        assert_eq!(
            summary.data_types(),
            vec![("a", ColumnType::Integer), ("b", ColumnType::Integer)]
        );
        assert_facets_match_columns(&summary);
    }

    #[test]
    fn test_header_without_rows() {
        let summary = collect(&dataset(&["x"], &[]), &SummaryOptions::extended());
        assert_eq!(summary.dimensions(), (0, 1));
        assert_eq!(summary.missing_counts(), vec![("x", 0)]);
        assert_eq!(summary.data_types(), vec![("x", ColumnType::Float)]);
        assert_eq!(summary.distinct_counts(), Some(vec![("x", 0)]));
        assert_facets_match_columns(&summary);
    }

    #[test]
    fn test_all_missing_column() {
        let summary = collect(
            &dataset(&["col"], &[&[None], &[None], &[None]]),
            &SummaryOptions::extended(),
        );
        assert_eq!(summary.missing_counts(), vec![("col", 3)]);
        assert_eq!(summary.data_types(), vec![("col", ColumnType::Float)]);
        assert_eq!(summary.distinct_counts(), Some(vec![("col", 0)]));
        assert_eq!(summary.columns()[0].frequencies, Some(vec![]));
        assert_facets_match_columns(&summary);
    }

    #[test]
    fn test_no_columns() {
        let summary = collect(&dataset(&[], &[]), &SummaryOptions::extended());
        assert_eq!(summary.dimensions(), (0, 0));
        assert!(summary.column_names().is_empty());
        assert!(summary.has_distinct_counts());
        assert_eq!(summary.distinct_counts(), Some(vec![]));
    }

    #[test]
    fn test_optional_facets_off_by_default() {
        let summary = collect(&sample(), &SummaryOptions::default());
        assert_eq!(summary.distinct_counts(), None);
        assert!(summary.value_frequencies().is_none());
        assert!(!summary.has_distinct_counts());
        assert!(!summary.has_value_frequencies());
        assert_facets_match_columns(&summary);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let data = sample();
        let options = SummaryOptions::extended();
        assert_eq!(collect(&data, &options), collect(&data, &options));
    }

    #[test]
    fn test_duplicate_column_names_pass_through() {
        let summary = collect(
            &dataset(&["x", "x"], &[&[Some("1"), None]]),
            &SummaryOptions::default(),
        );
        assert_eq!(summary.missing_counts(), vec![("x", 0), ("x", 1)]);
    }

    #[test]
    fn test_frequencies_sorted_with_first_seen_ties() {
        let summary = collect(
            &dataset(
                &["fruit"],
                &[
                    &[Some("pear")],
                    &[Some("apple")],
                    &[Some("fig")],
                    &[Some("apple")],
                    &[None],
                    &[Some("fig")],
                    &[Some("kiwi")],
                ],
            ),
            &SummaryOptions::extended(),
        );
        let freqs = summary.columns()[0].frequencies.clone().unwrap();
        let pairs: Vec<(&str, usize)> = freqs.iter().map(|f| (f.value.as_str(), f.count)).collect();
        assert_eq!(
            pairs,
            vec![("apple", 2), ("fig", 2), ("pear", 1), ("kiwi", 1)]
        );
        assert_facets_match_columns(&summary);
    }

    #[test]
    fn test_typed_values_group_together() {
        let summary = collect(
            &dataset(
                &["n", "flag"],
                &[
                    &[Some("1"), Some("TRUE")],
                    &[Some("01"), Some("true")],
                    &[Some("2"), Some("False")],
                ],
            ),
            &SummaryOptions::extended(),
        );
        assert_eq!(summary.distinct_counts(), Some(vec![("n", 2), ("flag", 2)]));
        let flag = summary.columns()[1].frequencies.clone().unwrap();
        assert_eq!(flag[0].value, "true");
        assert_eq!(flag[0].count, 2);
    }

    #[test]
    fn test_summary_serializes_facets() {
        let summary = collect(&sample(), &SummaryOptions::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["rows"], 3);
        assert_eq!(json["columns"][0]["name"], "a");
        assert_eq!(json["columns"][0]["data_type"], "integer");
        assert!(json["columns"][0].get("distinct").is_none());
    }
}
