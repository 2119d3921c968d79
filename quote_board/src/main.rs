//! Quote Board — polls a quotes endpoint and keeps a table of the latest prices on
//! screen. A fetch runs immediately at startup and then every `--interval-ms`;
//! a spinner is shown while a request is in flight, and a placeholder row when
//! there is nothing to show yet. Failed fetches are logged to stderr and the last
//! good table stays on screen.
//!
//! Usage example (CLI):
//! ```bash
//! quote_board --url http://127.0.0.1:8080/quotes --interval-ms 2000 --zone utc
//! RUST_LOG=debug quote_board --once
//! ```
#![warn(missing_docs)]
use std::io::{self, IsTerminal};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use clap::Parser;
use log::info;
use quote_board::args::Args;
use quote_board::terminal::Screen;
use quote_board::{BoardConfig, HttpQuoteSource, QuoteBoard, QuoteSource};
use quote_common::{QuoteError, Result};

/// Upper bound on how long the main loop waits before re-checking for Ctrl+C.
const POLL_TIMEOUT: Duration = Duration::from_millis(200);

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();
    let config = BoardConfig::try_from(&args)?;
    let source: Arc<dyn QuoteSource> = Arc::new(HttpQuoteSource::new(&config)?);

    let stdout = io::stdout();
    let clear = !args.plain && !args.once && stdout.is_terminal();
    let mut screen = Screen::new(stdout.lock(), clear);
    let mut board = QuoteBoard::new(source, config);

    if args.once {
        let outcome = board.refresh();
        screen.draw(&board.view())?;
        return outcome;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down quote board...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .map_err(|e| QuoteError::Io(io::Error::other(e)))?;
    }

    board.mount()?;
    screen.draw(&board.view())?;
    info!("Quote board is running. Press Ctrl+C to exit.");

    while !shutdown.load(Ordering::Relaxed) {
        if board.pump(POLL_TIMEOUT) {
            screen.draw(&board.view())?;
        }
    }

    board.unmount();
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
