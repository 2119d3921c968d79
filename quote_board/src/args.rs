//! Command-line arguments for the quote board.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use quote_common::DisplayZone;

use crate::config::{DEFAULT_INTERVAL_MS, DEFAULT_TIMEOUT_MS, DEFAULT_URL};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Quotes endpoint answering `GET` with a JSON array of quotes.
    #[clap(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Delay between the start of two fetch cycles, in milliseconds.
    #[clap(
        long,
        default_value_t = DEFAULT_INTERVAL_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Per-request timeout, in milliseconds.
    #[clap(
        long,
        default_value_t = DEFAULT_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: u64,

    /// Zone used to render the Time column.
    #[clap(long, value_enum, default_value_t = DisplayZone::Local)]
    pub zone: DisplayZone,

    /// Run a single fetch cycle, print the table and exit.
    #[clap(long)]
    pub once: bool,

    /// Append frames instead of clearing the screen between them.
    #[clap(long)]
    pub plain: bool,
}
