//! Visitor records.
//!
//! A [`VisitorRecord`] is one person's single visit: an identity fixed at
//! check-in plus an optional check-out time that can be set exactly once.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::TimestampFormat;

/// Table cell shown for visitors who have not checked out.
pub const CURRENTLY_INSIDE_LABEL: &str = "Currently Inside";

/// Position of a record in the registry, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(pub usize);

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorState {
    /// On the premises.
    CheckedIn,
    /// Left; terminal.
    CheckedOut,
}

/// A single visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorRecord {
    name: String,
    contact: String,
    checked_in_at: DateTime<Utc>,
    checked_out_at: Option<DateTime<Utc>>,
}

impl VisitorRecord {
    /// Create a checked-in record. No validation is performed.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        contact: impl Into<String>,
        checked_in_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            checked_in_at,
            checked_out_at: None,
        }
    }

    /// The visitor's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The visitor's contact details.
    #[must_use]
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// When the visitor arrived.
    #[must_use]
    pub fn checked_in_at(&self) -> DateTime<Utc> {
        self.checked_in_at
    }

    /// When the visitor left, if they have.
    #[must_use]
    pub fn checked_out_at(&self) -> Option<DateTime<Utc>> {
        self.checked_out_at
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> VisitorState {
        if self.checked_out_at.is_some() {
            VisitorState::CheckedOut
        } else {
            VisitorState::CheckedIn
        }
    }

    /// Whether the visitor is still on the premises.
    #[must_use]
    pub fn is_inside(&self) -> bool {
        self.checked_out_at.is_none()
    }

    /// Record the visitor leaving at `at`.
    ///
    /// A time earlier than the check-in is clamped to the check-in time so
    /// that `checked_out_at >= checked_in_at` always holds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyCheckedOut`] if a check-out time is already
    /// set. The record is left untouched.
    pub fn mark_checked_out(&mut self, at: DateTime<Utc>) -> Result<()> {
        if let Some(checked_out_at) = self.checked_out_at {
            return Err(Error::AlreadyCheckedOut {
                name: self.name.clone(),
                checked_out_at,
            });
        }
        self.checked_out_at = Some(at.max(self.checked_in_at));
        Ok(())
    }

    /// One-line human readable description, as written to the activity log.
    #[must_use]
    pub fn describe(&self, format: &TimestampFormat) -> String {
        let mut line = format!(
            "Visitor: {}, Contact: {}, Checked-in: {}",
            self.name,
            self.contact,
            format.render(self.checked_in_at)
        );
        match self.checked_out_at {
            Some(at) => {
                line.push_str(", Checked-out: ");
                line.push_str(&format.render(at));
            }
            None => line.push_str(", Currently inside"),
        }
        line
    }

    /// Project the record onto a table row.
    #[must_use]
    pub fn to_table_row(&self, format: &TimestampFormat) -> TableRow {
        TableRow {
            name: self.name.clone(),
            contact: self.contact.clone(),
            checked_in: format.render(self.checked_in_at),
            checked_out: self.checked_out_at.map_or_else(
                || CURRENTLY_INSIDE_LABEL.to_string(),
                |at| format.render(at),
            ),
        }
    }

    /// Read-only view for callers outside the registry.
    #[must_use]
    pub fn view(&self) -> VisitorView {
        VisitorView {
            name: self.name.clone(),
            contact: self.contact.clone(),
            checked_in_at: self.checked_in_at,
            checked_out_at: self.checked_out_at,
            state: self.state(),
        }
    }
}

/// Snapshot of a record handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorView {
    /// The visitor's name.
    pub name: String,
    /// The visitor's contact details.
    pub contact: String,
    /// When the visitor arrived.
    pub checked_in_at: DateTime<Utc>,
    /// When the visitor left; `null` while inside.
    pub checked_out_at: Option<DateTime<Utc>>,
    /// Whether the visitor is still inside.
    pub state: VisitorState,
}

/// One row of the visitor table, with timestamps already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Name column.
    pub name: String,
    /// Contact Info column.
    pub contact: String,
    /// Check-In Time column.
    pub checked_in: String,
    /// Check-Out Time column, or [`CURRENTLY_INSIDE_LABEL`].
    pub checked_out: String,
}

impl TableRow {
    /// Column headers, in display order.
    pub const HEADERS: [&'static str; 4] =
        ["Name", "Contact Info", "Check-In Time", "Check-Out Time"];

    /// Cells in display order.
    #[must_use]
    pub fn cells(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.contact.as_str(),
            self.checked_in.as_str(),
            self.checked_out.as_str(),
        ]
    }
}
