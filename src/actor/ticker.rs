//! Ticker Actor: the fixed-interval clock driving reveal cadence.
//!
//! A dedicated thread delivers [`Tick`] events over a small bounded
//! channel. The channel deliberately holds almost nothing: if the consumer
//! falls behind, late ticks are dropped rather than queued, so a missed
//! tick delays reveal but never makes it burst or skip ahead.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event delivered at a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Tick number, monotonically increasing from 0.
    pub frame: u64,
    /// Time elapsed since the ticker started.
    pub elapsed: Duration,
}

/// Ticker actor generating the reveal clock.
pub struct TickerActor {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
    /// The configured interval.
    interval: Duration,
}

impl TickerActor {
    /// Spawn a ticker with the given interval.
    ///
    /// Intervals come from [`RevealOptions::tick_interval`], e.g. 50ms for
    /// the default typewriter speed. Zero intervals are clamped to 1ms.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the ticker thread.
    ///
    /// [`RevealOptions::tick_interval`]: crate::reveal::RevealOptions::tick_interval
    pub fn spawn(interval: Duration) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // Capacity 2: enough to never stall a healthy consumer, small
        // enough that a stalled one drops ticks instead of replaying them.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("unfurl-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })
            .expect("Failed to spawn ticker thread");

        Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
            interval,
        }
    }

    /// Get a reference to the tick receiver.
    ///
    /// Use this with `select!` to combine the clock with other producers:
    ///
    /// ```ignore
    /// loop {
    ///     select! {
    ///         recv(ticker.receiver()) -> _tick => { session.tick(); }
    ///         recv(fragments) -> event => handle_arrival(event),
    ///     }
    /// }
    /// ```
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// The configured tick interval.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Signal the ticker to shut down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main ticker loop.
    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &Arc<AtomicBool>, interval: Duration) {
        let start = Instant::now();
        let mut frame = 0u64;
        let mut next_tick = start + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next_tick {
                // Sleep in short slices so shutdown stays responsive.
                thread::sleep((next_tick - now).min(Duration::from_millis(1)));
                continue;
            }

            let tick = Tick {
                frame,
                elapsed: now - start,
            };

            // Non-blocking send: a full buffer means the consumer is
            // behind, and queued ticks would turn into a reveal burst.
            let _ = tick_tx.try_send(tick);

            frame += 1;
            next_tick += interval;

            // If we fell behind, rebase instead of firing a backlog.
            if next_tick < now {
                next_tick = now + interval;
            }
        }
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
