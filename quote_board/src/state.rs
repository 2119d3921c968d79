//! View state driving the board.
//!
//! The state holds the last accepted quote list and the number of fetch cycles
//! in flight. It is mutated only by applying [`FetchEvent`]s, in the order the
//! owner receives them:
//!
//! - a cycle start raises the in-flight count (the board shows "loading");
//! - a successful cycle replaces the list wholesale, unless a newer cycle has
//!   already been applied, in which case the stale list is discarded;
//! - a failed cycle is logged and leaves the list untouched.
//!
//! Every apply returns whether something visible changed so callers can skip
//! redundant redraws.
use std::collections::HashSet;

use log::{debug, error, warn};
use quote_common::{Quote, QuoteError};

use crate::scheduler::FetchEvent;

/// In-memory data behind the current render.
#[derive(Debug, Default)]
pub struct ViewState {
    quotes: Vec<Quote>,
    in_flight: usize,
    latest_applied: u64,
}

impl ViewState {
    /// Quotes in the order the source returned them.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// `true` while at least one fetch cycle is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of cycles started but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Sequence number of the newest applied list, `0` before the first one.
    pub fn latest_applied(&self) -> u64 {
        self.latest_applied
    }

    /// Apply a scheduler event. Returns `true` if the render output may differ.
    pub fn apply(&mut self, event: FetchEvent) -> bool {
        match event {
            FetchEvent::Started { seq } => self.begin(seq),
            FetchEvent::Finished {
                seq,
                outcome: Ok(quotes),
            } => self.succeed(seq, quotes),
            FetchEvent::Finished {
                seq,
                outcome: Err(err),
            } => self.fail(seq, &err),
        }
    }

    /// Record that cycle `seq` is in flight.
    pub fn begin(&mut self, seq: u64) -> bool {
        debug!("Fetch cycle #{} started", seq);
        let was_loading = self.is_loading();
        self.in_flight += 1;
        !was_loading
    }

    /// Record the list returned by cycle `seq`.
    pub fn succeed(&mut self, seq: u64, quotes: Vec<Quote>) -> bool {
        let was_loading = self.is_loading();
        self.finish();
        let loading_changed = was_loading != self.is_loading();

        if seq <= self.latest_applied {
            debug!(
                "Discarding stale result of cycle #{} (cycle #{} already applied)",
                seq, self.latest_applied
            );
            return loading_changed;
        }

        warn_on_duplicate_symbols(seq, &quotes);
        debug!("Fetch cycle #{} applied {} quotes", seq, quotes.len());
        let list_changed = self.quotes != quotes;
        self.quotes = quotes;
        self.latest_applied = seq;
        list_changed || loading_changed
    }

    /// Record that cycle `seq` failed. The current list is kept.
    pub fn fail(&mut self, seq: u64, err: &QuoteError) -> bool {
        error!("Fetch cycle #{} failed ({}): {}", seq, err.kind(), err);
        let was_loading = self.is_loading();
        self.finish();
        was_loading != self.is_loading()
    }

    /// Forget cycles that will never finish. Returns `true` if loading was on.
    pub fn abandon_in_flight(&mut self) -> bool {
        if self.in_flight > 0 {
            debug!("Abandoning {} in-flight fetch cycles", self.in_flight);
        }
        let was_loading = self.is_loading();
        self.in_flight = 0;
        was_loading
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

fn warn_on_duplicate_symbols(seq: u64, quotes: &[Quote]) {
    let mut seen = HashSet::with_capacity(quotes.len());
    for quote in quotes {
        if !seen.insert(quote.symbol.as_str()) {
            warn!(
                "Cycle #{} returned symbol {} more than once; rows are keyed by position",
                seq, quote.symbol
            );
        }
    }
}
