//! The quote board component.
//!
//! `QuoteBoard` ties a [`QuoteSource`] to a [`ViewState`]. Mounting acquires a
//! [`FetchScheduler`] that polls the source on a fixed interval; unmounting (or
//! dropping the board) releases it. Scheduler events are applied on the thread
//! that owns the board, through [`QuoteBoard::pump`], so the view state never
//! needs a lock.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossbeam_channel::{Receiver, never, unbounded};
use log::{info, warn};
use quote_common::Result;

use crate::config::BoardConfig;
use crate::scheduler::{FetchEvent, FetchScheduler};
use crate::source::QuoteSource;
use crate::state::ViewState;
use crate::view::BoardView;

/// A polling quote table with its own schedule.
pub struct QuoteBoard {
    source: Arc<dyn QuoteSource>,
    config: BoardConfig,
    state: ViewState,
    sequence: Arc<AtomicU64>,
    events: Receiver<FetchEvent>,
    scheduler: Option<FetchScheduler>,
}

impl QuoteBoard {
    /// Create an unmounted board.
    pub fn new(source: Arc<dyn QuoteSource>, config: BoardConfig) -> Self {
        Self {
            source,
            config,
            state: ViewState::default(),
            sequence: Arc::new(AtomicU64::new(0)),
            events: never(),
            scheduler: None,
        }
    }

    /// Start polling: one fetch now, then one per interval.
    ///
    /// The view state starts empty on every mount.
    pub fn mount(&mut self) -> Result<()> {
        if self.is_mounted() {
            warn!("Quote board is already mounted");
            return Ok(());
        }

        self.state = ViewState::default();
        self.sequence = Arc::new(AtomicU64::new(0));
        let (events_tx, events_rx) = unbounded::<FetchEvent>();
        let scheduler = FetchScheduler::start(
            Arc::clone(&self.source),
            self.config.interval,
            events_tx,
            Arc::clone(&self.sequence),
        )?;
        self.events = events_rx;
        self.scheduler = Some(scheduler);

        info!(
            "Quote board mounted. Source: {} Interval: {:?}",
            self.source.describe(),
            self.config.interval
        );
        Ok(())
    }

    /// Stop polling. Results of requests still in flight are dropped.
    ///
    /// The last applied list stays readable; the loading state is cleared since
    /// the dropped cycles will never report back.
    pub fn unmount(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
            // Late workers now send into a closed channel.
            self.events = never();
            self.state.abandon_in_flight();
            info!("Quote board unmounted");
        }
    }

    /// Returns `true` between `mount` and `unmount`.
    pub fn is_mounted(&self) -> bool {
        self.scheduler
            .as_ref()
            .map(FetchScheduler::is_running)
            .unwrap_or(false)
    }

    /// Wait up to `timeout` for fetch events and apply all that are available.
    ///
    /// Returns `true` if the view may have changed.
    pub fn pump(&mut self, timeout: Duration) -> bool {
        let first = match self.events.recv_timeout(timeout) {
            Ok(event) => event,
            Err(_) => return false,
        };

        let mut changed = self.state.apply(first);
        while let Ok(event) = self.events.try_recv() {
            changed |= self.state.apply(event);
        }
        changed
    }

    /// Run one fetch cycle on the calling thread.
    ///
    /// The outcome is applied like a scheduled cycle; the error is also returned.
    pub fn refresh(&mut self) -> Result<()> {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.begin(seq);
        match self.source.fetch() {
            Ok(quotes) => {
                self.state.succeed(seq, quotes);
                Ok(())
            }
            Err(err) => {
                self.state.fail(seq, &err);
                Err(err)
            }
        }
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Build the current frame.
    pub fn view(&self) -> BoardView {
        BoardView::build(
            &self.state,
            self.config.zone,
            self.config.interval,
            &self.source.describe(),
        )
    }
}

impl Drop for QuoteBoard {
    fn drop(&mut self) {
        self.unmount();
    }
}
