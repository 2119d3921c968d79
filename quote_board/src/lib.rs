//! Quote board: a terminal table of market quotes polled from an HTTP endpoint.
//!
//! The library is organized bottom-up:
//! - `args` / `config` — command-line interface and the validated settings built from it.
//! - `source` — the `QuoteSource` seam and its HTTP implementation.
//! - `scheduler` — timer thread dispatching fetch cycles to worker threads.
//! - `state` — the view state and the rules for applying fetch results.
//! - `view` — render model and text table layout.
//! - `board` — the `QuoteBoard` component tying the above together.
//! - `terminal` — frame output to stdout or any `Write` sink.
#![warn(missing_docs)]
pub mod args;
pub mod board;
pub mod config;
pub mod scheduler;
pub mod source;
pub mod state;
pub mod terminal;
pub mod view;

pub use board::QuoteBoard;
pub use config::BoardConfig;
pub use source::{HttpQuoteSource, QuoteSource};
