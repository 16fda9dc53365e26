//! Vigil CLI: drives the token-hashing bridge from the command line.
//!
//! Provides `vigil run` for running a scenario and exporting fingerprints,
//! `vigil signals` for browsing a model's signal catalog, `vigil compare` for
//! diffing two exported tables, and `vigil hash` for replaying a token stream
//! on the host.

#![warn(missing_docs)]

mod compare;
mod config;
mod hash;
mod run;
mod signals;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vigil_common::parse_u32_literal;

/// Vigil: cycle-level signal fingerprinting.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about = "Vigil token-hashing bridge")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `vigil.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the configured scenario and export the fingerprints.
    Run(RunArgs),
    /// List catalogued signals of a model.
    Signals(SignalsArgs),
    /// Compare two exported CSV fingerprint tables.
    Compare(CompareArgs),
    /// Hash a token sequence on the host.
    Hash(HashArgs),
}

/// Arguments for the `vigil run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Reference model to simulate.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Loop count or run length.
    #[arg(short, long)]
    pub cycles: Option<u64>,

    /// First hash seed (decimal or 0x hex).
    #[arg(long, value_parser = parse_literal)]
    pub seed0: Option<u32>,

    /// Second hash seed (decimal or 0x hex).
    #[arg(long, value_parser = parse_literal)]
    pub seed1: Option<u32>,

    /// Export format.
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormatArg>,

    /// Write the export here instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// `+key=value` runtime arguments.
    pub plusargs: Vec<String>,
}

/// Arguments for the `vigil signals` subcommand.
#[derive(Parser, Debug)]
pub struct SignalsArgs {
    /// Reference model whose catalog to list.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Module path query (segment suffix match).
    #[arg(long, default_value = "")]
    pub module: String,

    /// Signal name or `*`/`?` glob.
    #[arg(short, long, default_value = "*")]
    pub pattern: String,
}

/// Arguments for the `vigil compare` subcommand.
#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Reference CSV export.
    pub left: String,

    /// CSV export to check against the reference.
    pub right: String,
}

/// Arguments for the `vigil hash` subcommand.
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// First hash seed (decimal or 0x hex).
    #[arg(long, value_parser = parse_literal, default_value = "0")]
    pub seed0: u32,

    /// Second hash seed (decimal or 0x hex).
    #[arg(long, value_parser = parse_literal, default_value = "0")]
    pub seed1: u32,

    /// Tokens to hash, in order (decimal or 0x hex).
    #[arg(value_parser = parse_literal, required = true)]
    pub tokens: Vec<u32>,
}

/// Export format selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// `signal,hash,count` CSV.
    Csv,
    /// Aligned plain text.
    Text,
    /// JSON with the seed pair.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a config file or directory.
    pub config: Option<String>,
}

fn parse_literal(text: &str) -> Result<u32, String> {
    parse_u32_literal(text).map_err(|e| e.to_string())
}

fn init_tracing(global: &GlobalArgs) {
    let filter = if global.verbose {
        EnvFilter::new("debug")
    } else if global.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Signals(ref args) => signals::run(args, &global),
        Command::Compare(ref args) => compare::run(args, &global),
        Command::Hash(ref args) => hash::run(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
