//! Error types shared by the board library and binary.
//!
//! The `QuoteError` enum unifies transport, decoding and configuration failures so
//! that every layer can propagate a single error type. `FailureKind` folds the
//! variants into the coarse taxonomy used when a fetch cycle is logged.
use std::io;

use strum_macros::Display;
use thiserror::Error;

/// Unified error type shared by the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error from threads, sockets or the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The HTTP request could not complete (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status code.
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    /// The body was not valid JSON or did not have the shape of a quote list.
    #[error("JSON deserialization error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A timestamp value that does not describe a point in time.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Rejected command-line configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a failed fetch cycle.
#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum FailureKind {
    /// The request never produced a usable response.
    Network,
    /// A response arrived but its body could not be decoded.
    Parse,
    /// Anything else (local I/O, configuration).
    Internal,
}

impl QuoteError {
    /// Classify this error for diagnostics.
    pub fn kind(&self) -> FailureKind {
        match self {
            QuoteError::Network(_) | QuoteError::HttpStatus(_) => FailureKind::Network,
            QuoteError::Parse(_) | QuoteError::InvalidTimestamp(_) => FailureKind::Parse,
            QuoteError::Io(_) | QuoteError::Config(_) => FailureKind::Internal,
        }
    }
}
