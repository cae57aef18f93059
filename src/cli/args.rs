//! Command-line arguments and subcommands for the gsunit CLI.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gsunit",
    version,
    about = "Assertions with deep structural equality and scoped execution hooks."
)]
pub struct GsUnitArgs {
    /// When to color output.
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the library's own describe/it suites.
    Selftest {
        /// Print the run summary as JSON instead of the report.
        #[arg(long)]
        json: bool,
    },
    /// Deep-compare two JSON documents.
    Compare {
        #[arg(required = true)]
        expected: PathBuf,
        #[arg(required = true)]
        actual: PathBuf,
    },
    /// Run a JSON script of named assertions.
    Check {
        /// The path to the JSON script.
        #[arg(required = true)]
        script: PathBuf,
        /// Print the run summary as JSON instead of the report.
        #[arg(long)]
        json: bool,
    },
}
