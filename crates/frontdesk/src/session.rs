//! Interactive front-desk session.
//!
//! A session owns one [`Registry`] for its whole lifetime and reads one
//! command per line, the way the desk clerk would press buttons: check a
//! visitor in, check one out, list who is inside, show the log.

use std::io::{BufRead, Write};
use std::path::Path;

use clap::{CommandFactory, Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::input::{CheckIn, CheckOut};
use crate::registry::Registry;
use crate::render::{self, OutputFormat};
use crate::time::{Clock, SystemClock};

/// One line of session input.
#[derive(Debug, Parser)]
#[command(name = "session", no_binary_name = true)]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
#[command(disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

/// Commands understood inside a session.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SessionCommand {
    /// Check in a visitor
    #[command(visible_alias = "in")]
    CheckIn {
        /// Visitor name
        #[arg(allow_hyphen_values = true)]
        name: String,
        /// Contact details
        #[arg(allow_hyphen_values = true)]
        contact: String,
    },

    /// Check out the earliest-arrived visitor with this name
    #[command(visible_alias = "out")]
    CheckOut {
        /// Visitor name
        #[arg(allow_hyphen_values = true)]
        name: String,
    },

    /// Show visitors currently inside
    Current,

    /// Show the activity log
    Log,

    /// Show every visit as a table
    Table,

    /// Switch the output format
    Format {
        /// New output format
        #[arg(value_enum)]
        format: OutputFormat,
    },

    /// Show available commands
    Help,

    /// End the session
    #[command(visible_alias = "quit")]
    Exit,
}

impl SessionCommand {
    /// Parse a line of session input.
    ///
    /// Words are split the way a POSIX shell splits them: `"` or `'` quote
    /// a word that contains spaces, and a backslash escapes the next
    /// character (so `"Dana \"DJ\" O'Lee"` is one word).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionSyntax`] for an unterminated quote or an
    /// unknown or malformed command.
    pub fn parse_line(line: &str) -> Result<Self> {
        let words =
            shlex::split(line).ok_or_else(|| Error::session_syntax("unterminated quote"))?;
        SessionLine::try_parse_from(words)
            .map(|parsed| parsed.command)
            .map_err(|err| Error::session_syntax(err.to_string().trim_end()))
    }
}

/// Whether the session should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop reading.
    Exit,
}

/// Counts reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Commands executed, including failed ones.
    pub commands: usize,
    /// Commands that were reported as errors.
    pub errors: usize,
}

/// A running front-desk session.
#[derive(Debug)]
pub struct Session<C = SystemClock> {
    registry: Registry<C>,
    format: OutputFormat,
    prompt: String,
    echo: bool,
}

impl Session<SystemClock> {
    /// Build a session on the system clock from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured timestamp format is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let registry = Registry::with_clock(SystemClock, config.timestamp_format()?);
        Ok(Self::new(registry, config.display.format)
            .with_prompt(config.session.prompt.clone())
            .with_echo(config.session.echo))
    }
}

impl<C: Clock> Session<C> {
    /// Wrap a registry. No prompt, no echo.
    #[must_use]
    pub fn new(registry: Registry<C>, format: OutputFormat) -> Self {
        Self {
            registry,
            format,
            prompt: String::new(),
            echo: false,
        }
    }

    /// Set the prompt text.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Echo each command, prefixed by the prompt, before its output.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The session's registry.
    #[must_use]
    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    /// The current output format.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Parse and run one line.
    ///
    /// # Errors
    ///
    /// Returns recoverable errors ([`Error::is_recoverable`]) for bad input
    /// or unknown visitors, and I/O errors from writing output.
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let command = SessionCommand::parse_line(line)?;
        debug!(?command, "session command");
        self.dispatch(command, out)
    }

    fn dispatch(&mut self, command: SessionCommand, out: &mut impl Write) -> Result<Flow> {
        match command {
            SessionCommand::CheckIn { name, contact } => {
                let id = CheckIn::new(name, contact)?.apply(&mut self.registry);
                if let Some(record) = self.registry.get(id) {
                    render::event(out, self.format, record, self.registry.timestamp_format())?;
                }
            }
            SessionCommand::CheckOut { name } => {
                let request = CheckOut::new(name)?;
                let timestamps = self.registry.timestamp_format().clone();
                let record = request.apply(&mut self.registry)?;
                render::event(out, self.format, record, &timestamps)?;
            }
            SessionCommand::Current => render::current(out, self.format, &self.registry)?,
            SessionCommand::Log => render::log(out, self.format, &self.registry)?,
            SessionCommand::Table => render::table(out, self.format, &self.registry)?,
            SessionCommand::Format { format } => {
                self.format = format;
                writeln!(out, "Output format: {format}")?;
            }
            SessionCommand::Help => {
                write!(out, "{}", SessionLine::command().render_help())?;
            }
            SessionCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands from `input` until it ends or `exit` is given.
    ///
    /// Blank lines and lines starting with `#` are skipped. Recoverable
    /// errors are written to `out` and the session continues.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(
        &mut self,
        mut input: impl BufRead,
        out: &mut impl Write,
    ) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut line = String::new();

        loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let Some(text) = command_text(&line) else {
                continue;
            };
            if self.echo {
                writeln!(out, "{}{text}", self.prompt)?;
            }
            if self.step(text, out, &mut summary)? == Flow::Exit {
                break;
            }
        }

        Ok(self.finish(summary))
    }

    /// Read commands from the terminal with line editing and history.
    ///
    /// Ctrl-C discards the current line; Ctrl-D ends the session. When
    /// `history` is given, earlier input is loaded from it and the session's
    /// input is appended on exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the line editor cannot be set up or fails, or if
    /// writing output fails.
    pub fn run_terminal(
        &mut self,
        history: Option<&Path>,
        out: &mut impl Write,
    ) -> Result<SessionSummary> {
        let config = rustyline::Config::builder()
            .history_ignore_space(true)
            .build();
        let mut editor = DefaultEditor::with_config(config)?;
        if let Some(path) = history {
            if let Err(err) = editor.load_history(path) {
                debug!(path = %path.display(), %err, "no session history loaded");
            }
        }

        let mut summary = SessionSummary::default();
        loop {
            let line = match editor.readline(&self.prompt) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            };
            let Some(text) = command_text(&line) else {
                continue;
            };
            editor.add_history_entry(text)?;
            let flow = self.step(text, out, &mut summary)?;
            out.flush()?;
            if flow == Flow::Exit {
                break;
            }
        }

        if let Some(path) = history {
            let saved = path
                .parent()
                .map_or(Ok(()), std::fs::create_dir_all)
                .map_err(Error::from)
                .and_then(|()| editor.save_history(path).map_err(Error::from));
            if let Err(err) = saved {
                warn!(path = %path.display(), %err, "failed to save session history");
            }
        }
        Ok(self.finish(summary))
    }

    /// Run one command line, reporting recoverable errors to `out`.
    fn step(
        &mut self,
        text: &str,
        out: &mut impl Write,
        summary: &mut SessionSummary,
    ) -> Result<Flow> {
        summary.commands += 1;
        match self.execute(text, out) {
            Ok(flow) => Ok(flow),
            Err(err) if err.is_recoverable() => {
                summary.errors += 1;
                writeln!(out, "{err}")?;
                Ok(Flow::Continue)
            }
            Err(err) => Err(err),
        }
    }

    fn finish(&self, summary: SessionSummary) -> SessionSummary {
        info!(
            commands = summary.commands,
            errors = summary.errors,
            visitors = self.registry.len(),
            "session ended"
        );
        summary
    }
}

/// The command on a line of input, or `None` for blank and `#` comment lines.
fn command_text(line: &str) -> Option<&str> {
    let text = line.trim();
    (!text.is_empty() && !text.starts_with('#')).then_some(text)
}
