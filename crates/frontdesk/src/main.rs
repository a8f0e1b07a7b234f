//! `frontdesk` - CLI for the front desk visitor tracker
//!
//! This binary runs interactive or scripted front-desk sessions and manages
//! configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use clap::Parser;
use tracing::debug;

use frontdesk::cli::{Cli, Command, ConfigCommand, SessionArgs};
use frontdesk::{init_logging, Config, Error, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Session(args) => handle_session(&config, args),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn handle_session(config: &Config, args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::from_config(config)?;
    if let Some(format) = args.format {
        session = session.with_format(format);
    }
    if args.echo {
        session = session.with_echo(true);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = match args.script {
        Some(path) => {
            debug!("Running script {}", path.display());
            let file = File::open(&path).map_err(|source| Error::ScriptOpen {
                path: path.clone(),
                source,
            })?;
            session.run(BufReader::new(file), &mut out)?
        }
        None if io::stdin().is_terminal() => {
            let history = config.history_path();
            session.run_terminal(history.as_deref(), &mut out)?
        }
        None => session.run(io::stdin().lock(), &mut out)?,
    };

    debug!(
        commands = summary.commands,
        errors = summary.errors,
        "session finished"
    );
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Display]");
                println!("  Timestamp format:   {}", config.display.timestamp_format);
                println!("  Timezone:           {}", config.display.timezone);
                println!("  Output format:      {}", config.display.format);
                println!();
                println!("[Session]");
                println!("  Prompt:             {:?}", config.session.prompt);
                println!("  Echo commands:      {}", config.session.echo);
                println!("  Keep history:       {}", config.session.history);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
