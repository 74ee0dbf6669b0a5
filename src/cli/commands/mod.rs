//! Command implementations for the xlsx-json CLI
//!
//! Each command lives in its own module; shared helpers for logging,
//! configuration and progress reporting are in [`shared`].

pub mod convert;
pub mod shared;

pub use shared::ConversionStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Main command runner
///
/// Dispatches to the handler for the parsed subcommand.
pub async fn run(args: Args) -> Result<ConversionStats> {
    match args.command {
        Some(Commands::Convert(convert_args)) => convert::run_convert(convert_args).await,
        None => Err(Error::configuration("No command given; try `xlsx-json --help`")),
    }
}
