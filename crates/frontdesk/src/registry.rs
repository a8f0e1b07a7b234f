//! The visitor registry.
//!
//! The registry owns every [`VisitorRecord`] of a session in arrival order,
//! together with an append-only activity log. Each log line is rendered at
//! the moment of its event and never rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::time::{Clock, SystemClock, TimestampFormat};
use crate::visitor::{TableRow, VisitorId, VisitorRecord, VisitorView};

/// What happened in an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A visitor arrived.
    CheckIn,
    /// A visitor left.
    CheckOut,
}

/// One entry of the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// The record the event applies to.
    pub visitor: VisitorId,
    /// Check-in or check-out.
    pub kind: ActivityKind,
    /// When the event happened.
    pub at: DateTime<Utc>,
    /// The record's description at the time of the event.
    pub line: String,
}

/// In-memory owner of all visitor records and the activity log.
#[derive(Debug)]
pub struct Registry<C = SystemClock> {
    records: Vec<VisitorRecord>,
    activity: Vec<ActivityEntry>,
    clock: C,
    format: TimestampFormat,
}

impl Registry<SystemClock> {
    /// Create an empty registry on the system clock with the default format.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock, TimestampFormat::default())
    }
}

impl Default for Registry<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Registry<C> {
    /// Create an empty registry reading time from `clock` and rendering
    /// timestamps with `format`.
    #[must_use]
    pub fn with_clock(clock: C, format: TimestampFormat) -> Self {
        Self {
            records: Vec::new(),
            activity: Vec::new(),
            clock,
            format,
        }
    }

    /// The clock this registry reads.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The timestamp format used for log lines and table cells.
    #[must_use]
    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.format
    }

    /// Register an arriving visitor.
    ///
    /// Always succeeds. Names need not be unique; the caller is responsible
    /// for rejecting blank input.
    pub fn check_in(&mut self, name: &str, contact: &str) -> VisitorId {
        let at = self.clock.now();
        let id = VisitorId(self.records.len());
        let record = VisitorRecord::new(name, contact, at);
        let line = record.describe(&self.format);
        self.records.push(record);
        self.append(id, ActivityKind::CheckIn, at, line);

        info!(visitor = %id, name, "visitor checked in");
        id
    }

    /// Check out the earliest-arrived visitor named `name` who is still
    /// inside.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VisitorNotFound`] if nobody by that name is inside.
    /// The registry is unchanged in that case.
    pub fn check_out(&mut self, name: &str) -> Result<&VisitorRecord> {
        let Some(index) = self.find_inside(name) else {
            debug!(name, "check-out requested for unknown visitor");
            return Err(Error::visitor_not_found(name));
        };

        let at = self.clock.now();
        let record = &mut self.records[index];
        record.mark_checked_out(at)?;
        let at = record.checked_out_at().unwrap_or(at);
        let line = record.describe(&self.format);

        let id = VisitorId(index);
        self.append(id, ActivityKind::CheckOut, at, line);
        info!(visitor = %id, name, "visitor checked out");
        Ok(&self.records[index])
    }

    fn find_inside(&self, name: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.is_inside() && record.name() == name)
    }

    fn append(
        &mut self,
        visitor: VisitorId,
        kind: ActivityKind,
        at: DateTime<Utc>,
        line: String,
    ) {
        self.activity.push(ActivityEntry {
            visitor,
            kind,
            at,
            line,
        });
    }

    /// Records still inside, in arrival order.
    pub fn current_visitors(&self) -> impl Iterator<Item = &VisitorRecord> {
        self.records.iter().filter(|record| record.is_inside())
    }

    /// Views of the records still inside, in arrival order.
    #[must_use]
    pub fn list_current_visitors(&self) -> Vec<VisitorView> {
        let current: Vec<VisitorView> =
            self.current_visitors().map(VisitorRecord::view).collect();
        debug!(count = current.len(), "listed current visitors");
        current
    }

    /// The activity log lines, oldest first.
    #[must_use]
    pub fn log(&self) -> Vec<&str> {
        self.activity.iter().map(|entry| entry.line.as_str()).collect()
    }

    /// The full activity log with event metadata.
    #[must_use]
    pub fn activity(&self) -> &[ActivityEntry] {
        &self.activity
    }

    /// One table row per record, in arrival order.
    #[must_use]
    pub fn snapshot_table(&self) -> Vec<TableRow> {
        self.records
            .iter()
            .map(|record| record.to_table_row(&self.format))
            .collect()
    }

    /// Every record, in arrival order.
    #[must_use]
    pub fn records(&self) -> &[VisitorRecord] {
        &self.records
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: VisitorId) -> Option<&VisitorRecord> {
        self.records.get(id.0)
    }

    /// Number of records, inside or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no visitor has checked in yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
