//! Timer-driven dispatch of fetch cycles.
//!
//! A `FetchScheduler` owns one timer thread. The thread dispatches a cycle as soon
//! as it starts and then one per tick, until the scheduler is stopped or dropped.
//! Every cycle runs on its own worker thread so a slow request never delays the
//! next tick; cycles may therefore overlap and finish in any order. Each cycle is
//! tagged with a sequence number so the consumer can discard stale results.
//!
//! Events flow one way, from the workers to whoever owns the receiving end:
//!
//! ```text
//! quote-timer ──Started{seq}──▶ events ◀──Finished{seq, outcome}── quote-fetch-<seq>
//! ```
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, select, tick};
use log::{debug, error, info};
use quote_common::{Quote, QuoteError, Result};

use crate::source::QuoteSource;

/// Progress report of a single fetch cycle.
#[derive(Debug)]
pub enum FetchEvent {
    /// Cycle `seq` was dispatched; its request is in flight.
    Started {
        /// Cycle sequence number.
        seq: u64,
    },
    /// Cycle `seq` completed.
    Finished {
        /// Cycle sequence number.
        seq: u64,
        /// The fetched list or the reason it could not be fetched.
        outcome: Result<Vec<Quote>>,
    },
}

/// Handle to the running timer thread.
///
/// Stopping (explicitly or on drop) joins the timer thread, so no cycle is
/// dispatched after `stop` returns. Workers already in flight are left to finish.
pub struct FetchScheduler {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FetchScheduler {
    /// Spawn the timer thread and dispatch the first cycle immediately.
    ///
    /// Sequence numbers are drawn from `sequence`, which may be shared with other
    /// producers of cycles.
    pub fn start(
        source: Arc<dyn QuoteSource>,
        interval: Duration,
        events: Sender<FetchEvent>,
        sequence: Arc<AtomicU64>,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(String::from("quote-timer"))
            .spawn(move || run_timer(source, interval, events, sequence, stop_rx))?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Returns `true` until `stop` has been called.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancel the schedule and wait for the timer thread to exit.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects `stop_rx`, which wakes the timer.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Quote timer thread panicked");
            }
            info!("Quote timer stopped");
        }
    }
}

impl Drop for FetchScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_timer(
    source: Arc<dyn QuoteSource>,
    interval: Duration,
    events: Sender<FetchEvent>,
    sequence: Arc<AtomicU64>,
    stop_rx: Receiver<()>,
) {
    info!("Quote timer started. Interval: {:?}", interval);
    let ticker = tick(interval);

    if !dispatch(&source, &events, &sequence) {
        return;
    }

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {
                // A stop request racing with a tick wins.
                if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                    break;
                }
                if !dispatch(&source, &events, &sequence) {
                    break;
                }
            }
        }
    }
}

/// Start one fetch cycle. Returns `false` once nobody listens for events anymore.
fn dispatch(
    source: &Arc<dyn QuoteSource>,
    events: &Sender<FetchEvent>,
    sequence: &AtomicU64,
) -> bool {
    let seq = sequence.fetch_add(1, Ordering::SeqCst) + 1;

    // `Started` is queued before the worker exists, so it always precedes `Finished`.
    if events.send(FetchEvent::Started { seq }).is_err() {
        debug!("Event receiver closed, stopping timer");
        return false;
    }

    let source = Arc::clone(source);
    let worker_events = events.clone();
    let spawned = thread::Builder::new()
        .name(format!("quote-fetch-{}", seq))
        .spawn(move || {
            let outcome = source.fetch();
            if worker_events.send(FetchEvent::Finished { seq, outcome }).is_err() {
                debug!("Fetch cycle #{} finished after teardown, result dropped", seq);
            }
        });

    if let Err(e) = spawned {
        error!("Failed to spawn fetch worker #{}: {}", seq, e);
        let outcome = Err(QuoteError::Io(e));
        return events.send(FetchEvent::Finished { seq, outcome }).is_ok();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    struct EmptySource;

    impl QuoteSource for EmptySource {
        fn fetch(&self) -> Result<Vec<Quote>> {
            Ok(Vec::new())
        }

        fn describe(&self) -> String {
            String::from("empty")
        }
    }

    #[test]
    fn first_cycle_is_dispatched_without_waiting_for_a_tick() {
        let (events_tx, events_rx) = unbounded();
        let sequence = Arc::new(AtomicU64::new(0));
        let mut scheduler = FetchScheduler::start(
            Arc::new(EmptySource),
            Duration::from_secs(60),
            events_tx,
            Arc::clone(&sequence),
        )
        .unwrap();

        let timeout = Duration::from_secs(2);
        assert!(matches!(
            events_rx.recv_timeout(timeout).unwrap(),
            FetchEvent::Started { seq: 1 }
        ));
        assert!(matches!(
            events_rx.recv_timeout(timeout).unwrap(),
            FetchEvent::Finished { seq: 1, outcome: Ok(ref quotes) } if quotes.is_empty()
        ));

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(sequence.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sequence_numbers_increase_per_tick() {
        let (events_tx, events_rx) = unbounded();
        let scheduler = FetchScheduler::start(
            Arc::new(EmptySource),
            Duration::from_millis(5),
            events_tx,
            Arc::new(AtomicU64::new(0)),
        )
        .unwrap();

        let started: Vec<u64> = events_rx
            .iter()
            .filter_map(|event| match event {
                FetchEvent::Started { seq } => Some(seq),
                FetchEvent::Finished { .. } => None,
            })
            .take(3)
            .collect();
        drop(scheduler);

        assert_eq!(started, vec![1, 2, 3]);
    }

    #[test]
    fn timer_exits_when_the_receiver_is_gone() {
        let (events_tx, events_rx) = unbounded();
        drop(events_rx);
        let mut scheduler = FetchScheduler::start(
            Arc::new(EmptySource),
            Duration::from_millis(5),
            events_tx,
            Arc::new(AtomicU64::new(0)),
        )
        .unwrap();

        // Joins promptly because the timer gave up on its own.
        scheduler.stop();
        assert!(!scheduler.is_running());
    }
}
