//! Command-line surface of the report tool

mod args;

pub use args::{CliArgs, OutputFormat, PeriodKind, StrategyType};

use clap::Parser;

/// Parse the process arguments
///
/// On invalid input or `--help`, clap prints its message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
