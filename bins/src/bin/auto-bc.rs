// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! The AutoBC command line
//!

use auto_bc_app::{AppError, Config, FormSession, greet};
use auto_bc_core::{DateOption, SystemClock};
use clap::{Parser, Subcommand};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use std::path::PathBuf;

#[macro_use]
extern crate log;
extern crate simplelog;

/// AutoBC entry point
///
/// One of:
/// - List the selectable dates
/// - List the print targets
/// - Create/show the config
/// - Fill in and submit the form
fn main() {
    let args = Cli::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("auto_bc")
        .build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(error) = CombinedLogger::init(vec![TermLogger::new(
        level,
        config_log,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]) {
        eprintln!("Unable to set up logging: {error}");
    }

    if let Err(error) = run(args) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run(args: Cli) -> Result<(), AppError> {
    match args.command {
        Command::Config => {
            let path = match &args.config {
                Some(path) => {
                    Config::ensure_setup_at(path)?;
                    path.clone()
                }
                None => Config::ensure_setup()?,
            };
            let config = Config::load_from(&path)?;
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::Dates => {
            let config = load_config(&args.config)?;
            let window = config.date_window(&SystemClock)?;
            for (index, option) in window.options().iter().enumerate() {
                print_date(index, option);
            }
        }
        Command::Options => {
            let config = load_config(&args.config)?;
            for entry in config.option_codes.entries() {
                println!("{:<12} {}", entry.key.as_str(), entry.codes.join(", "));
            }
        }
        Command::Submit {
            password,
            start,
            end,
            options,
            json,
        } => {
            let config = load_config(&args.config)?;
            let mut session = FormSession::new(&config, &SystemClock)?;
            if !json {
                println!("{}\n", greet(&current_user()));
            }

            // Password
            if session.on_password_changed(&password)?.password_clamped {
                warn!(
                    "Password cut down to {} characters",
                    config.max_password_len
                );
            }

            // Print targets (everything not asked for is unchecked)
            session.on_options_selected(options.as_slice())?;

            // Dates
            session.on_start_date_changed(start)?;
            if let Some(end) = end {
                session.on_end_date_selected(end)?;
            }

            // Run
            let submission = session.submit()?;
            if json {
                println!("{}", serde_json::to_string_pretty(submission)?);
            } else {
                println!("{submission}");
            }
            session.complete()?;
        }
    }
    Ok(())
}

/// The config file given on the command line, or the default one
fn load_config(path: &Option<PathBuf>) -> Result<Config, AppError> {
    match path {
        Some(path) => Config::load_from(path),
        None => {
            let path = Config::ensure_setup()?;
            Config::load_from(&path)
        }
    }
}

/// Login name of whoever is running this
fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| String::from("ゲスト"))
}

fn print_date(index: usize, option: &DateOption) {
    println!("{index:>3}  {}  {}", option.value(), option.display());
}

/// AutoBC CLI args using [clap]
#[derive(Parser, Debug)]
#[command(
    version,
    about = "AutoBC print job form",
    after_help = "Date indices are those printed by `dates`; --end counts from --start"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file (the per-user config is used if not given)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log what is going on
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the config file if it doesn't exist, then print it
    Config,

    /// List the dates that can be selected
    Dates,

    /// List the print targets and their codes
    Options,

    /// Fill in the form and submit it
    Submit {
        /// The BC desk password
        #[arg(long)]
        password: String,

        /// Index of the start date
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Index of the end date among the dates from the start onwards
        /// (keeps the configured default if not given)
        #[arg(long)]
        end: Option<usize>,

        /// A print target to include (repeat for more)
        #[arg(long = "option", required = true)]
        options: Vec<String>,

        /// Print the submission as JSON
        #[arg(long)]
        json: bool,
    },
}
