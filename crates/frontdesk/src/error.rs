//! Error types for frontdesk.
//!
//! This module defines all error types used throughout the frontdesk crate.
//! Registry and input errors are recoverable: the session reports them and
//! keeps going. Configuration and I/O errors end the run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The main error type for frontdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Registry Errors ===
    /// No currently-inside visitor matches the given name.
    #[error("visitor not found or already checked out: {name}")]
    VisitorNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The record already carries a check-out time.
    #[error("visitor {name} already checked out at {checked_out_at}")]
    AlreadyCheckedOut {
        /// Name on the record.
        name: String,
        /// The check-out time that is already set.
        checked_out_at: DateTime<Utc>,
    },

    // === Input Errors ===
    /// A required input field was blank.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Which field was blank.
        field: &'static str,
    },

    /// A session line could not be parsed.
    #[error("{message}")]
    SessionSyntax {
        /// Description of the problem, ready for display.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A session script could not be opened.
    #[error("failed to open script {path}: {source}")]
    ScriptOpen {
        /// Path to the script.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The terminal line editor failed.
    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for frontdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a visitor-not-found error.
    #[must_use]
    pub fn visitor_not_found(name: impl Into<String>) -> Self {
        Self::VisitorNotFound { name: name.into() }
    }

    /// Create an empty-field error.
    #[must_use]
    pub fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }

    /// Create a session syntax error.
    #[must_use]
    pub fn session_syntax(message: impl Into<String>) -> Self {
        Self::SessionSyntax {
            message: message.into(),
        }
    }

    /// Check if this error means no matching visitor is inside.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VisitorNotFound { .. })
    }

    /// Check if the user can correct the input and retry.
    ///
    /// A session prints recoverable errors and reads the next line; anything
    /// else aborts the session.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::VisitorNotFound { .. }
                | Self::AlreadyCheckedOut { .. }
                | Self::EmptyField { .. }
                | Self::SessionSyntax { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitor_not_found_display() {
        let err = Error::visitor_not_found("Alice");
        assert_eq!(
            err.to_string(),
            "visitor not found or already checked out: Alice"
        );
    }

    #[test]
    fn test_empty_field_display() {
        assert_eq!(Error::empty_field("name").to_string(), "name cannot be empty");
        assert_eq!(
            Error::empty_field("contact").to_string(),
            "contact cannot be empty"
        );
    }

    #[test]
    fn test_already_checked_out_display() {
        let at = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let err = Error::AlreadyCheckedOut {
            name: "Bob".to_string(),
            checked_out_at: at,
        };
        let msg = err.to_string();
        assert!(msg.contains("Bob"));
        assert!(msg.contains("2024-01-15"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::visitor_not_found("x").is_not_found());
        assert!(!Error::empty_field("name").is_not_found());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::visitor_not_found("x").is_recoverable());
        assert!(Error::empty_field("name").is_recoverable());
        assert!(Error::session_syntax("bad").is_recoverable());

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(!Error::from(io_err).is_recoverable());
        assert!(!Error::ConfigValidation {
            message: "x".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_session_syntax_display_is_verbatim() {
        let err = Error::session_syntax("unterminated quote");
        assert_eq!(err.to_string(), "unterminated quote");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_script_open_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::ScriptOpen {
            path: PathBuf::from("/tmp/visits.txt"),
            source: io_err,
        };
        assert!(err.to_string().contains("/tmp/visits.txt"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "timestamp_format cannot be empty".to_string(),
        };
        assert!(err.to_string().contains("timestamp_format"));
    }
}
