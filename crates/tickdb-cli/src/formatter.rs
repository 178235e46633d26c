//! Output formatting for query results.
//!
//! Supports table, CSV, and JSON output formats.

use comfy_table::{Cell, ContentArrangement, Table};

use tickdb_engine::Tick;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// CSV output (timestamp,price,volume).
    Csv,
    /// JSON output.
    Json,
}

/// Formats a tick list according to the specified format.
pub fn format_ticks(ticks: &[Tick], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(ticks),
        OutputFormat::Csv => format_csv(ticks),
        OutputFormat::Json => format_json(ticks),
    }
}

fn format_table(ticks: &[Tick]) -> String {
    let mut table = Table::new();

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_header(vec!["Timestamp", "Price", "Volume"]);

    for tick in ticks {
        table.add_row(vec![
            Cell::new(tick.timestamp),
            Cell::new(format!("{:.2}", tick.price)),
            Cell::new(tick.volume),
        ]);
    }

    table.to_string()
}

fn format_csv(ticks: &[Tick]) -> String {
    let mut out = String::from("timestamp,price,volume\n");
    for tick in ticks {
        out.push_str(&format!(
            "{},{},{}\n",
            tick.timestamp, tick.price, tick.volume
        ));
    }
    out
}

fn format_json(ticks: &[Tick]) -> String {
    serde_json::to_string_pretty(ticks).unwrap_or_else(|_| "[]".to_string())
}
