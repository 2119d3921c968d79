//! Where quote lists come from.
//!
//! The board only needs "give me the current list"; `QuoteSource` is that seam.
//! `HttpQuoteSource` is the production implementation that performs a blocking
//! `GET` against the quotes endpoint. Tests plug in scripted sources instead.
use log::debug;
use quote_common::{Quote, QuoteError, Result};
use reqwest::Url;
use reqwest::blocking::Client;

use crate::config::BoardConfig;

/// A provider of complete quote lists.
///
/// Implementations are called from worker threads, possibly concurrently.
pub trait QuoteSource: Send + Sync {
    /// Fetch the current quote list.
    fn fetch(&self) -> Result<Vec<Quote>>;

    /// Human-readable origin shown in the board footer.
    fn describe(&self) -> String;
}

/// Fetches quotes over HTTP with a per-request timeout.
pub struct HttpQuoteSource {
    client: Client,
    url: Url,
}

impl HttpQuoteSource {
    /// Create a source for `config.url` honouring `config.timeout`.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QuoteError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl QuoteSource for HttpQuoteSource {
    fn fetch(&self) -> Result<Vec<Quote>> {
        debug!("GET {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().map_err(network_error)?;
        let quotes = Quote::list_from_slice(&body)?;
        debug!("Received {} quotes from {}", quotes.len(), self.url);
        Ok(quotes)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

fn network_error(err: reqwest::Error) -> QuoteError {
    QuoteError::Network(err.to_string())
}
