//!
//! Common types and utilities shared by the quote board crates.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` and its `FailureKind` classification.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `quote` — the `Quote` payload and its flexible timestamp decoding.
//! - `format` — price and time-of-day formatting used by the table renderer.
#![warn(missing_docs)]
pub mod error;
pub mod format;
pub mod quote;
pub mod result;

pub use error::{FailureKind, QuoteError};
pub use format::DisplayZone;
pub use quote::Quote;
pub use result::Result;
