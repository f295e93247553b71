use crate::DatasetSummary;
use std::io::{self, Write};

/// Interior width of a frame, in characters, when nothing needs more room.
pub const DEFAULT_FRAME_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Interior frame width. Never below [`DEFAULT_FRAME_WIDTH`]; grows to fit
    /// the longest line of the report.
    pub width: usize,
    /// Caps the entries listed per column in the frequency block.
    pub max_frequency_entries: Option<usize>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            width: DEFAULT_FRAME_WIDTH,
            max_frequency_entries: None,
        }
    }
}

enum Align {
    Left,
    Center,
}

struct Block {
    title: &'static str,
    align: Align,
    lines: Vec<String>,
}

/// Formats `n` with `,` between groups of three digits.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn blocks(summary: &DatasetSummary, options: &ReportOptions) -> Vec<Block> {
    let (rows, columns) = summary.dimensions();
    let mut blocks = vec![
        Block {
            title: "Dataset Shape",
            align: Align::Center,
            lines: vec![
                format!("Rows: {}", group_thousands(rows)),
                format!("Columns: {}", group_thousands(columns)),
            ],
        },
        Block {
            title: "Column Names",
            align: Align::Left,
            lines: summary
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
        },
        Block {
            title: "Missing Values",
            align: Align::Left,
            lines: summary
                .missing_counts()
                .into_iter()
                .map(|(name, count)| format!("{name}: {}", group_thousands(count)))
                .collect(),
        },
        Block {
            title: "Data Types",
            align: Align::Left,
            lines: summary
                .data_types()
                .into_iter()
                .map(|(name, data_type)| format!("{name}: {data_type}"))
                .collect(),
        },
    ];

    if let Some(distinct) = summary.distinct_counts() {
        blocks.push(Block {
            title: "Distinct Values",
            align: Align::Left,
            lines: distinct
                .into_iter()
                .map(|(name, count)| format!("{name}: {}", group_thousands(count)))
                .collect(),
        });
    }

    if let Some(frequencies) = summary.value_frequencies() {
        let mut lines = Vec::new();
        for (name, entries) in frequencies {
            lines.push(name.to_string());
            let shown = options
                .max_frequency_entries
                .map_or(entries.len(), |cap| cap.min(entries.len()));
            for entry in entries.iter().take(shown) {
                lines.push(format!("  {}: {}", entry.value, group_thousands(entry.count)));
            }
            if shown < entries.len() {
                lines.push(format!("  ... and {} more", group_thousands(entries.len() - shown)));
            }
        }
        blocks.push(Block {
            title: "Value Frequencies",
            align: Align::Left,
            lines,
        });
    }

    blocks
}

fn frame_width(blocks: &[Block], requested: usize) -> usize {
    let longest = blocks
        .iter()
        .flat_map(|b| b.lines.iter().map(|line| line.chars().count()).chain([b.title.len()]))
        .max()
        .unwrap_or(0);
    requested.max(DEFAULT_FRAME_WIDTH).max(longest + 2)
}

fn write_block<W: Write>(out: &mut W, block: &Block, width: usize) -> io::Result<()> {
    let border = format!("+{}+", "-".repeat(width));
    let inner = width - 2;
    writeln!(out, "{border}")?;
    writeln!(out, "| {:^inner$} |", block.title)?;
    writeln!(out, "{border}")?;
    for line in &block.lines {
        match block.align {
            Align::Left => writeln!(out, "| {line:<inner$} |")?,
            Align::Center => writeln!(out, "| {line:^inner$} |")?,
        }
    }
    writeln!(out, "{border}")?;
    writeln!(out)
}

/// Writes one framed block per facet in `summary` to `out`.
pub fn report<W: Write>(
    summary: &DatasetSummary,
    options: &ReportOptions,
    out: &mut W,
) -> io::Result<()> {
    let blocks = blocks(summary, options);
    let width = frame_width(&blocks, options.width);
    for block in &blocks {
        write_block(out, block, width)?;
    }
    Ok(())
}

/// [`report`] into a `String`.
pub fn render(summary: &DatasetSummary, options: &ReportOptions) -> String {
    let mut buf = Vec::new();
    // writes into a Vec cannot fail
    let _ = report(summary, options, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}
