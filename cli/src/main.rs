//! attrguard command line tool
//!
//! Validates a JSON attribute bag against a model schema file and prints a
//! JSON report.
//!
//! Usage:
//!   attrguard check --schema model.toml --input changes.json [--state stored.json]
//!
//! Exit status is 0 when the input is valid, 1 when it is rejected and 2
//! when the schema or an input file cannot be used.

use std::{fs, io::Read, path::Path, path::PathBuf, process::ExitCode};
use anyhow::{Context, Result};
use attrguard_cli::check;
use attrguard_model::ModelConfig;
use attrguard_types::{AttributeBag, bag_from_json};
use clap::{Parser, Subcommand};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "attrguard")]
#[command(about = "Declarative attribute validation")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an attribute bag against a schema
    Check {
        /// Schema file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        schema: PathBuf,

        /// JSON object of attributes to assign, `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// JSON object of attributes already stored in the model
        #[arg(long)]
        state: Option<PathBuf>,

        /// Replace invalid values with schema defaults
        #[arg(long, conflicts_with = "no_defaults")]
        use_defaults: bool,

        /// Keep stored values on failure, whatever the schema says
        #[arg(long)]
        no_defaults: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(args.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether the input was valid.
fn run(command: Command) -> Result<bool> {
    match command {
        Command::Check {
            schema,
            input,
            state,
            use_defaults,
            no_defaults,
        } => {
            let config = ModelConfig::load_from(&schema)?;
            let input = read_bag(&input)?;
            let state = state.as_deref().map(read_bag).transpose()?;

            let use_defaults = match (use_defaults, no_defaults) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };

            let report = check(&config, state, input, use_defaults)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(report.valid)
        }
    }
}

fn read_bag(path: &Path) -> Result<AttributeBag> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read attributes from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    bag_from_json(&contents).with_context(|| format!("Invalid attribute bag in {}", path.display()))
}
