//! Library interface for the `verbatim` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! # Documentation Generation
//!
//! The [`command()`] function returns the clap `Command` for generating man pages
//! and shell completions via `xtask`.

pub mod commands;

#[cfg(feature = "mcp")]
pub mod server;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use verbatim_core::LogLevel;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG               Log filter (e.g., debug, verbatim=trace)
    VERBATIM_LOG_PATH      Explicit log file path
    VERBATIM_LOG_DIR       Log directory
    VERBATIM_MIN_WORDS     Minimum shared run length, in words
    VERBATIM_NORMALIZE__*  Normalization rules (e.g., VERBATIM_NORMALIZE__STRIP_QUOTES=false)
";
/// Command-line interface definition for verbatim.
#[derive(Parser)]
#[command(name = "verbatim")]
#[command(about = "Find word runs a text shares verbatim with its sources", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log level, overriding the configured one
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Find word runs a candidate shares with one or more sources
    Compare(commands::compare::CompareArgs),

    /// Print a text the way it looks to the matcher
    Normalize(commands::normalize::NormalizeArgs),

    /// Show package information
    Info(commands::info::InfoArgs),

    /// Start MCP (Model Context Protocol) server on stdio
    #[cfg(feature = "mcp")]
    Serve(commands::serve::ServeArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        command().debug_assert();
    }

    #[test]
    fn compare_parses_sources_and_texts() {
        let cli = Cli::try_parse_from([
            "verbatim",
            "compare",
            "draft.txt",
            "a.txt",
            "wire=b.md",
            "--text",
            "pasted words",
            "--min-words",
            "7",
        ])
        .unwrap();
        let Some(Commands::Compare(args)) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.candidate, "draft.txt");
        assert_eq!(args.sources, ["a.txt", "wire=b.md"]);
        assert_eq!(args.text, ["pasted words"]);
        assert_eq!(args.min_words, Some(7));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["verbatim", "normalize", "x.txt", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn log_level_flag_parses() {
        let cli = Cli::try_parse_from(["verbatim", "--log-level", "warn", "info"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Warn));
    }
}
