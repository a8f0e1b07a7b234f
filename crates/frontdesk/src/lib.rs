//! `frontdesk` - Visitor check-in and check-out tracking for a front desk
//!
//! This library provides the visitor registry, its activity log, and the
//! interactive session that drives it from the command line.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod registry;
pub mod render;
pub mod session;
pub mod time;
pub mod visitor;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use registry::{ActivityEntry, ActivityKind, Registry};
pub use render::OutputFormat;
pub use session::{Session, SessionCommand, SessionSummary};
pub use time::{Clock, ManualClock, SystemClock, TimestampFormat, Timezone};
pub use visitor::{TableRow, VisitorId, VisitorRecord, VisitorState, VisitorView};
