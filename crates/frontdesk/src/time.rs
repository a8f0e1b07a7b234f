//! Clocks and timestamp rendering.
//!
//! Timestamps are stored as UTC. The registry reads "now" through a [`Clock`]
//! so tests can pin time, and renders timestamps through a
//! [`TimestampFormat`] chosen by configuration.

use std::cell::Cell;
use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default strftime pattern, close to an ISO-8601 local date-time.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Source of the current time.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Used by tests that need reproducible output.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute instant. Moving backwards is allowed.
    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }

    /// Move the clock by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Timezone used when rendering timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    /// The host's local timezone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Utc => write!(f, "utc"),
        }
    }
}

/// A validated strftime pattern plus the timezone to render in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pattern: String,
    timezone: Timezone,
}

impl TimestampFormat {
    /// Build a format, rejecting patterns chrono cannot render.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if the pattern is empty or contains
    /// an unknown specifier.
    pub fn new(pattern: impl Into<String>, timezone: Timezone) -> Result<Self> {
        let pattern = pattern.into();
        validate_pattern(&pattern)?;
        Ok(Self { pattern, timezone })
    }

    /// The strftime pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The rendering timezone.
    #[must_use]
    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Render a timestamp.
    #[must_use]
    pub fn render(&self, at: DateTime<Utc>) -> String {
        match self.timezone {
            Timezone::Utc => at.format(&self.pattern).to_string(),
            Timezone::Local => at.with_timezone(&Local).format(&self.pattern).to_string(),
        }
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            timezone: Timezone::Local,
        }
    }
}

/// Check that a strftime pattern is non-empty and fully understood by chrono.
///
/// # Errors
///
/// Returns [`Error::ConfigValidation`] describing the problem.
pub fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(Error::ConfigValidation {
            message: "timestamp_format cannot be empty".to_string(),
        });
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(Error::ConfigValidation {
            message: format!("invalid timestamp_format: {pattern}"),
        });
    }
    Ok(())
}
