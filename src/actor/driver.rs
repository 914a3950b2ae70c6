//! Reveal Driver: threaded composition of session, clock, and stream.
//!
//! The driver owns one reveal session for the lifetime of one source. Its
//! thread selects over two independent producers (the ticker and the
//! fragment channel) and feeds both into the session state machine,
//! publishing an owned [`Snapshot`] to the host whenever something visible
//! changed. No assumption is made about how the two cadences interleave.
//!
//! Replacing the source is expressed by dropping the driver (which cancels
//! the clock and detaches from the stream) and spawning a new one; reveal
//! progress never carries over.

use super::ticker::{Tick, TickerActor};
use crate::reveal::{ChangeFlags, RevealOptions, RevealSession, SourceId, SourceKind, StreamEvent, TextSource};
use crossbeam_channel::{never, select, Receiver, RecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// An owned view of the session state after a visible change.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Identity of the source being revealed.
    pub source_id: SourceId,
    /// The revealed prefix at the time of the snapshot.
    pub text: String,
    /// Number of fade segments revealed so far (0 in typewriter mode).
    pub revealed_segments: usize,
    /// What changed since the previous snapshot.
    pub flags: ChangeFlags,
}

/// Callback invoked with each snapshot, on the driver thread.
type UpdateFn = Box<dyn FnMut(Snapshot) + Send>;

/// Callback invoked exactly once when the session completes.
type CompleteFn = Box<dyn FnOnce() + Send>;

/// Driver actor revealing one text source on its own thread.
///
/// Dropping the driver cancels the active clock, detaches from the
/// fragment stream, and guarantees no further snapshot or completion
/// callback for the abandoned session.
pub struct RevealDriver {
    /// Handle to the driver thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Set by the driver thread when the session completes.
    finished: Arc<AtomicBool>,
    /// Identity of the driven source.
    source_id: SourceId,
}

impl RevealDriver {
    /// Spawn a driver revealing `source` under `options`.
    ///
    /// `on_update` receives a [`Snapshot`] after every visible change;
    /// `on_complete` fires exactly once, after the snapshot that carries
    /// [`ChangeFlags::COMPLETED`]. Both run on the driver thread. An empty
    /// static source completes immediately.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the driver thread.
    pub fn spawn(
        source: TextSource,
        options: RevealOptions,
        on_update: impl FnMut(Snapshot) + Send + 'static,
        on_complete: impl FnOnce() + Send + 'static,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));

        let session = RevealSession::new(&source, options.clone());
        let (source_id, kind) = source.into_parts();
        let fragments = match kind {
            SourceKind::Static(_) => never(),
            SourceKind::Stream(rx) => rx,
        };

        let shutdown_clone = shutdown.clone();
        let finished_clone = finished.clone();
        let handle = thread::Builder::new()
            .name("unfurl-reveal".to_string())
            .spawn(move || {
                Self::run_loop(
                    session,
                    fragments,
                    &options,
                    Box::new(on_update),
                    Box::new(on_complete),
                    &shutdown_clone,
                    &finished_clone,
                );
            })
            .expect("Failed to spawn reveal driver thread");

        Self {
            handle: Some(handle),
            shutdown,
            finished,
            source_id,
        }
    }

    /// Identity of the source this driver reveals.
    pub const fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Whether the session has completed.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }

    /// Signal the driver to shut down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the driver thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        self.join_inner();
    }

    fn join_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main driver loop: two producers, one consumer.
    fn run_loop(
        mut session: RevealSession,
        fragments: Receiver<StreamEvent>,
        options: &RevealOptions,
        mut on_update: UpdateFn,
        on_complete: CompleteFn,
        shutdown: &Arc<AtomicBool>,
        finished: &Arc<AtomicBool>,
    ) {
        let mut on_complete = Some(on_complete);
        let mut fragments = fragments;

        let mut emit = |session: &RevealSession, flags: ChangeFlags| {
            on_update(Snapshot {
                source_id: session.source_id(),
                text: session.revealed_text().to_string(),
                revealed_segments: session.revealed().len(),
                flags,
            });
        };

        // An empty static source is complete before the clock starts.
        if session.is_finished() {
            emit(&session, ChangeFlags::COMPLETED);
            finished.store(true, Ordering::Relaxed);
            if let Some(complete) = on_complete.take() {
                complete();
            }
            return;
        }

        // One event from either producer; classified inside the select
        // arms so the receivers are not borrowed while state mutates.
        enum Incoming {
            Clock(Result<Tick, RecvError>),
            Stream(Result<StreamEvent, RecvError>),
        }

        let ticker = TickerActor::spawn(options.tick_interval());

        while !shutdown.load(Ordering::Relaxed) {
            let incoming = select! {
                recv(ticker.receiver()) -> tick => Incoming::Clock(tick),
                recv(fragments) -> event => Incoming::Stream(event),
            };

            let flags = match incoming {
                Incoming::Clock(Ok(_)) => session.tick(),
                Incoming::Clock(Err(_)) => break,
                Incoming::Stream(Ok(StreamEvent::Fragment(text))) => {
                    session.push_fragment(&text)
                }
                Incoming::Stream(Ok(StreamEvent::Finished) | Err(_)) => {
                    // Stop selecting on a closed stream; a recv on a
                    // disconnected channel would otherwise spin.
                    fragments = never();
                    session.finish_stream()
                }
            };

            if !flags.is_empty() {
                emit(&session, flags);
            }

            if flags.contains(ChangeFlags::COMPLETED) {
                finished.store(true, Ordering::Relaxed);
                if let Some(complete) = on_complete.take() {
                    complete();
                }
                break;
            }
        }

        ticker.join();
    }
}

impl Drop for RevealDriver {
    fn drop(&mut self) {
        self.shutdown();
        self.join_inner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::RevealMode;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Fastest usable typewriter cadence for tests.
    fn fast_options(mode: RevealMode) -> RevealOptions {
        RevealOptions {
            mode,
            speed: 100,
            segment_delay: Duration::from_millis(10),
            ..RevealOptions::default()
        }
    }

    fn collecting_driver(
        source: TextSource,
        options: RevealOptions,
    ) -> (RevealDriver, Receiver<Snapshot>, Arc<AtomicUsize>) {
        let (snap_tx, snap_rx) = unbounded();
        let completions = Arc::new(AtomicUsize::new(0));
        let completions_clone = completions.clone();
        let driver = RevealDriver::spawn(
            source,
            options,
            move |snapshot| {
                let _ = snap_tx.send(snapshot);
            },
            move || {
                completions_clone.fetch_add(1, Ordering::Relaxed);
            },
        );
        (driver, snap_rx, completions)
    }

    fn wait_for_completion(snapshots: &Receiver<Snapshot>) -> Vec<Snapshot> {
        let mut seen = Vec::new();
        loop {
            let snapshot = snapshots
                .recv_timeout(Duration::from_secs(2))
                .expect("timed out waiting for snapshots");
            let done = snapshot.flags.contains(ChangeFlags::COMPLETED);
            seen.push(snapshot);
            if done {
                return seen;
            }
        }
    }

    #[test]
    fn test_static_source_reveals_to_completion() {
        let source = TextSource::text("Hello");
        let expected_id = source.id();
        let (driver, snapshots, completions) =
            collecting_driver(source, fast_options(RevealMode::Typewriter));

        let seen = wait_for_completion(&snapshots);
        let last = seen.last().unwrap();
        assert_eq!(last.text, "Hello");
        assert_eq!(last.source_id, expected_id);
        assert_eq!(completions.load(Ordering::Relaxed), 1);

        // Every snapshot is a prefix of the final text, in order.
        for pair in seen.windows(2) {
            assert!(pair[1].text.starts_with(&pair[0].text));
        }

        driver.join();
    }

    #[test]
    fn test_stream_source_reveals_fragment_concatenation() {
        let (sender, source) = TextSource::stream();
        let (driver, snapshots, completions) =
            collecting_driver(source, fast_options(RevealMode::Typewriter));

        sender.send("Hel");
        thread::sleep(Duration::from_millis(20));
        sender.send("lo");
        sender.finish();

        let seen = wait_for_completion(&snapshots);
        assert_eq!(seen.last().unwrap().text, "Hello");
        assert_eq!(completions.load(Ordering::Relaxed), 1);
        assert!(driver.is_finished());

        driver.join();
    }

    #[test]
    fn test_fade_segments_appear_in_order() {
        let (sender, source) = TextSource::stream();
        let (driver, snapshots, _) = collecting_driver(source, fast_options(RevealMode::Fade));

        sender.send("Hel");
        thread::sleep(Duration::from_millis(40));
        sender.send("lo");
        sender.finish();

        let seen = wait_for_completion(&snapshots);
        let segment_counts: Vec<usize> = seen
            .iter()
            .filter(|s| s.flags.contains(ChangeFlags::SEGMENT))
            .map(|s| s.revealed_segments)
            .collect();
        assert_eq!(segment_counts, [1, 2]);
        assert_eq!(seen.last().unwrap().text, "Hello");

        driver.join();
    }

    #[test]
    fn test_empty_static_source_completes_immediately() {
        let source = TextSource::text("");
        let (driver, snapshots, completions) =
            collecting_driver(source, fast_options(RevealMode::Typewriter));

        let seen = wait_for_completion(&snapshots);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].text, "");
        assert_eq!(completions.load(Ordering::Relaxed), 1);

        driver.join();
    }

    #[test]
    fn test_completion_fires_after_last_visible_update() {
        let source = TextSource::text("abc");
        let (snap_tx, snap_rx) = unbounded();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let order_updates = order.clone();
        let order_complete = order.clone();
        let driver = RevealDriver::spawn(
            source,
            fast_options(RevealMode::Typewriter),
            move |snapshot| {
                order_updates.lock().unwrap().push("update");
                let _ = snap_tx.send(snapshot);
            },
            move || order_complete.lock().unwrap().push("complete"),
        );

        wait_for_completion(&snap_rx);
        driver.join();

        let order = order.lock().unwrap();
        assert_eq!(order.last(), Some(&"complete"));
        assert_eq!(order.iter().filter(|s| **s == "complete").count(), 1);
    }

    #[test]
    fn test_drop_cancels_session() {
        let (sender, source) = TextSource::stream();
        let completions = Arc::new(AtomicUsize::new(0));
        let completions_clone = completions.clone();
        let driver = RevealDriver::spawn(
            source,
            fast_options(RevealMode::Typewriter),
            |_| {},
            move || {
                completions_clone.fetch_add(1, Ordering::Relaxed);
            },
        );

        sender.send("never finished");
        drop(driver);

        // The abandoned session fires no completion, and the producer
        // observes the detach.
        assert_eq!(completions.load(Ordering::Relaxed), 0);
        assert!(!sender.send("late"));
    }

    #[test]
    fn test_stalled_source_stays_incomplete() {
        let (sender, source) = TextSource::stream();
        let (driver, snapshots, completions) =
            collecting_driver(source, fast_options(RevealMode::Typewriter));

        sender.send("ab");
        // Drain what the stalled source produced so far.
        let mut last_text = String::new();
        while let Ok(snapshot) = snapshots.recv_timeout(Duration::from_millis(200)) {
            last_text = snapshot.text;
        }
        assert_eq!(last_text, "ab");

        // No finish signal: still revealing, never complete, no callback.
        assert!(!driver.is_finished());
        assert_eq!(completions.load(Ordering::Relaxed), 0);

        drop(sender);
        driver.join();
    }
}
