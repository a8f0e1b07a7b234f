//! Report rendering.
//!
//! Turns registry state into text for the terminal: plain lines, an aligned
//! table, or pretty-printed JSON.

use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::Registry;
use crate::time::{Clock, TimestampFormat};
use crate::visitor::{TableRow, VisitorRecord, VisitorView};

/// Output format for reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render the outcome of a check-in or check-out.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn event(
    out: &mut impl Write,
    format: OutputFormat,
    record: &VisitorRecord,
    timestamps: &TimestampFormat,
) -> Result<()> {
    match format {
        OutputFormat::Plain | OutputFormat::Table => {
            writeln!(out, "{}", record.describe(timestamps))?;
        }
        OutputFormat::Json => json(out, &record.view())?,
    }
    Ok(())
}

/// Render the visitors still inside.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn current<C: Clock>(
    out: &mut impl Write,
    format: OutputFormat,
    registry: &Registry<C>,
) -> Result<()> {
    let timestamps = registry.timestamp_format();
    match format {
        OutputFormat::Plain => {
            writeln!(out, "Current Visitors:")?;
            for record in registry.current_visitors() {
                writeln!(out, "{}", record.describe(timestamps))?;
            }
        }
        OutputFormat::Table => {
            let rows: Vec<TableRow> = registry
                .current_visitors()
                .map(|record| record.to_table_row(timestamps))
                .collect();
            aligned_table(out, &rows)?;
        }
        OutputFormat::Json => {
            let views: Vec<VisitorView> = registry.list_current_visitors();
            json(out, &views)?;
        }
    }
    Ok(())
}

/// Render the activity log.
///
/// JSON output carries each entry's record id, event kind and event time
/// alongside the rendered line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn log<C: Clock>(
    out: &mut impl Write,
    format: OutputFormat,
    registry: &Registry<C>,
) -> Result<()> {
    match format {
        OutputFormat::Plain | OutputFormat::Table => {
            writeln!(out, "Visitor Log:")?;
            for line in registry.log() {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => json(out, registry.activity())?,
    }
    Ok(())
}

/// Render every record as a table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn table<C: Clock>(
    out: &mut impl Write,
    format: OutputFormat,
    registry: &Registry<C>,
) -> Result<()> {
    let rows = registry.snapshot_table();
    match format {
        OutputFormat::Plain => {
            writeln!(out, "{}", TableRow::HEADERS.join("\t"))?;
            for row in &rows {
                writeln!(out, "{}", row.cells().join("\t"))?;
            }
        }
        OutputFormat::Table => aligned_table(out, &rows)?,
        OutputFormat::Json => json(out, &rows)?,
    }
    Ok(())
}

fn json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn aligned_table(out: &mut impl Write, rows: &[TableRow]) -> Result<()> {
    let mut widths = TableRow::HEADERS.map(|header| header.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(out, TableRow::HEADERS, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", rule.join("-+-"))?;
    for row in rows {
        write_row(out, row.cells(), &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, cells: [&str; 4], widths: &[usize; 4]) -> Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    writeln!(out, "{}", padded.join(" | ").trim_end())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ActivityEntry, ActivityKind};
    use crate::time::{ManualClock, Timezone};
    use crate::visitor::VisitorId;
    use chrono::{Duration, TimeZone, Utc};

    fn populated() -> Registry<ManualClock> {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let format = TimestampFormat::new("%H:%M", Timezone::Utc).unwrap();
        let mut registry = Registry::with_clock(ManualClock::new(start), format);
        registry.check_in("Alice", "a@x.com");
        registry.clock().advance(Duration::minutes(15));
        registry.check_in("Bob", "b@x.com");
        registry.clock().advance(Duration::minutes(15));
        registry.check_out("Alice").unwrap();
        registry
    }

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_current_plain() {
        let registry = populated();
        let text = rendered(|out| current(out, OutputFormat::Plain, &registry));
        assert_eq!(
            text,
            "Current Visitors:\nVisitor: Bob, Contact: b@x.com, Checked-in: 09:15, Currently inside\n"
        );
    }

    #[test]
    fn test_current_json() {
        let registry = populated();
        let text = rendered(|out| current(out, OutputFormat::Json, &registry));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let list = value.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], "Bob");
        assert!(list[0]["checked_out_at"].is_null());
        assert_eq!(list[0]["state"], "checked_in");
    }

    #[test]
    fn test_log_plain() {
        let registry = populated();
        let text = rendered(|out| log(out, OutputFormat::Plain, &registry));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Visitor Log:");
        assert_eq!(
            lines[3],
            "Visitor: Alice, Contact: a@x.com, Checked-in: 09:00, Checked-out: 09:30"
        );
    }

    #[test]
    fn test_log_json_carries_activity() {
        let registry = populated();
        let text = rendered(|out| log(out, OutputFormat::Json, &registry));
        let entries: Vec<ActivityEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(entries, registry.activity());

        let kinds: Vec<ActivityKind> = entries.iter().map(|entry| entry.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::CheckIn,
                ActivityKind::CheckIn,
                ActivityKind::CheckOut
            ]
        );
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        assert_eq!(entries[2].at, start + Duration::minutes(30));
        assert_eq!(entries[2].visitor, VisitorId(0));
        let lines: Vec<&str> = entries.iter().map(|entry| entry.line.as_str()).collect();
        assert_eq!(lines, registry.log());

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[2]["kind"], "check_out");
    }

    #[test]
    fn test_table_plain_is_tab_separated() {
        let registry = populated();
        let text = rendered(|out| table(out, OutputFormat::Plain, &registry));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name\tContact Info\tCheck-In Time\tCheck-Out Time");
        assert_eq!(lines[1], "Alice\ta@x.com\t09:00\t09:30");
        assert_eq!(lines[2], "Bob\tb@x.com\t09:15\tCurrently Inside");
    }

    #[test]
    fn test_table_aligned() {
        let registry = populated();
        let text = rendered(|out| table(out, OutputFormat::Table, &registry));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Name  | Contact Info | Check-In Time | Check-Out Time"
        );
        let rule = ["-".repeat(5), "-".repeat(12), "-".repeat(13), "-".repeat(16)].join("-+-");
        assert_eq!(lines[1], rule);
        assert_eq!(
            lines[3],
            "Bob   | b@x.com      | 09:15         | Currently Inside"
        );
    }

    #[test]
    fn test_table_json_rows() {
        let registry = populated();
        let text = rendered(|out| table(out, OutputFormat::Json, &registry));
        let rows: Vec<TableRow> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows, registry.snapshot_table());
    }

    #[test]
    fn test_event_plain_and_json() {
        let registry = populated();
        let record = &registry.records()[1];
        let format = registry.timestamp_format();

        let text = rendered(|out| event(out, OutputFormat::Plain, record, format));
        assert!(text.starts_with("Visitor: Bob"));

        let text = rendered(|out| event(out, OutputFormat::Json, record, format));
        let view: VisitorView = serde_json::from_str(&text).unwrap();
        assert_eq!(view, record.view());
    }

    #[test]
    fn test_empty_current_plain_has_heading_only() {
        let registry = Registry::new();
        let text = rendered(|out| current(out, OutputFormat::Plain, &registry));
        assert_eq!(text, "Current Visitors:\n");
    }
}
