//! Validated runtime configuration built from [`Args`].
use std::time::Duration;

use quote_common::{DisplayZone, QuoteError, Result};
use reqwest::Url;

use crate::args::Args;

/// Endpoint polled when `--url` is not given.
pub const DEFAULT_URL: &str = "http://127.0.0.1:8080/quotes";
/// Refresh interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 2000;
/// Per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Settings shared by the quote source, the scheduler and the renderer.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Quotes endpoint.
    pub url: Url,
    /// Delay between two fetch cycles.
    pub interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Zone for the Time column.
    pub zone: DisplayZone,
}

impl BoardConfig {
    /// Build a config for `url` with default timings.
    pub fn new(url: &str) -> Result<Self> {
        Ok(BoardConfig {
            url: parse_url(url)?,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            zone: DisplayZone::default(),
        })
    }

    /// Override the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the display zone.
    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }
}

impl TryFrom<&Args> for BoardConfig {
    type Error = QuoteError;

    fn try_from(args: &Args) -> Result<Self> {
        if args.interval_ms == 0 {
            return Err(QuoteError::Config(String::from("--interval-ms must be positive")));
        }
        if args.timeout_ms == 0 {
            return Err(QuoteError::Config(String::from("--timeout-ms must be positive")));
        }
        Ok(BoardConfig {
            url: parse_url(&args.url)?,
            interval: Duration::from_millis(args.interval_ms),
            timeout: Duration::from_millis(args.timeout_ms),
            zone: args.zone,
        })
    }
}

/// Parse an endpoint URL, trimming whitespace and matching quotes.
///
/// This allows passing URLs in quotes from Windows shells without breaking parsing.
fn parse_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    let url = Url::parse(no_quotes)
        .map_err(|e| QuoteError::Config(format!("invalid URL {:?}: {}", no_quotes, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(QuoteError::Config(format!("unsupported URL scheme: {}", other))),
    }
}
