//! Output formatting for parsed records
//!
//! Records are shown as a table with one row per record, or written out as
//! pretty-printed JSON.

use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table, presets};
use csvb_format::{Record, Value};
use std::io::Write;
use std::path::Path;

/// Title of the leading column holding the record index
pub const INDEX_COLUMN: &str = "(index)";

/// Table style configuration
#[derive(Debug, Clone, Copy)]
pub struct OutputStyle {
    /// Whether to use Unicode characters for borders
    pub use_unicode: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self { use_unicode: true }
    }
}

impl OutputStyle {
    /// Use ASCII characters instead of Unicode
    #[must_use]
    pub fn ascii(mut self) -> Self {
        self.use_unicode = false;
        self
    }
}

/// Create a styled table
pub fn create_table(style: OutputStyle) -> Table {
    let mut table = Table::new();

    if style.use_unicode {
        table
            .load_preset(presets::UTF8_FULL)
            .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(presets::ASCII_FULL);
    }

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);

    table
}

/// Style a table header cell
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Left)
}

fn value_cell(value: &Value) -> Cell {
    let cell = Cell::new(value);
    match value {
        Value::Number(_) => cell.set_alignment(CellAlignment::Right),
        _ => cell,
    }
}

/// Render records as a table: an index column, then one column per schema column
///
/// Absent values are left blank.
pub fn records_table(records: &[Record], style: OutputStyle) -> Table {
    let mut table = create_table(style);

    let mut header = vec![header_cell(INDEX_COLUMN)];
    if let Some(first) = records.first() {
        header.extend(first.schema().names().into_iter().map(header_cell));
    }
    table.set_header(header);

    for (index, record) in records.iter().enumerate() {
        let mut row = vec![Cell::new(index)];
        row.extend(record.values().iter().map(value_cell));
        table.add_row(row);
    }

    table
}

/// Serialize records as a pretty-printed JSON array
pub fn records_json(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize records")
}

/// Write the JSON array to standard output
pub fn write_json_stdout(records: &[Record]) -> Result<()> {
    let json = records_json(records)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write JSON to stdout")
}

/// Write the JSON array to a file, replacing any existing content
pub fn write_json_file(records: &[Record], path: &Path) -> Result<()> {
    let json = records_json(records)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write JSON to '{}'", path.display()))
}
