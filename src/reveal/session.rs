//! Reveal session: the state machine at the heart of the engine.
//!
//! A [`RevealSession`] turns an accumulating text buffer into a
//! time-ordered sequence of visible-text prefixes. It is deliberately
//! clock-agnostic: two independent producers drive it, fragment arrivals
//! ([`push_fragment`](RevealSession::push_fragment) /
//! [`finish_stream`](RevealSession::finish_stream)) and a fixed-interval
//! clock ([`tick`](RevealSession::tick)), and the machine is correct under
//! either producer firing zero, one, or many times between the other's
//! events. Every mutation reports what changed as [`ChangeFlags`].
//!
//! The threaded composition of session, clock, and stream lives in
//! [`crate::actor`]; this module has no threads and is fully synchronous,
//! which is also how its tests drive it.

use super::segment::{chunk_words, Segment};
use super::source::{SourceId, TextSource};
use bitflags::bitflags;
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

bitflags! {
    /// What changed as the result of one session mutation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChangeFlags: u8 {
        /// The revealed prefix grew.
        const TEXT = 1 << 0;
        /// A new fade segment became visible.
        const SEGMENT = 1 << 1;
        /// The source signalled that it has finished producing.
        const STREAM_ENDED = 1 << 2;
        /// The session finished: stream ended and buffer fully revealed.
        /// Reported at most once per session.
        const COMPLETED = 1 << 3;
    }
}

/// How text becomes visible over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealMode {
    /// Reveal a fixed number of grapheme clusters per tick.
    #[default]
    Typewriter,
    /// Reveal whole delivered segments, one per tick, each with an
    /// associated fade-in duration for the presentation layer.
    Fade,
}

/// Configuration for a reveal session.
#[derive(Debug, Clone)]
pub struct RevealOptions {
    /// Reveal mode.
    pub mode: RevealMode,
    /// Abstract reveal rate, 1..=100. For typewriter mode this selects the
    /// tick cadence; values outside the range are clamped.
    pub speed: u32,
    /// Grapheme clusters advanced per typewriter tick. Larger values speed
    /// up reveal without changing the timer frequency.
    pub chunk_size: usize,
    /// Fade-in duration per segment, forwarded to the presentation layer.
    pub fade_duration: Duration,
    /// Gap between successive fade segments. Also the fade-mode tick
    /// cadence.
    pub segment_delay: Duration,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            mode: RevealMode::Typewriter,
            speed: 20,
            chunk_size: 1,
            fade_duration: Duration::from_millis(200),
            segment_delay: Duration::from_millis(50),
        }
    }
}

impl RevealOptions {
    /// The fixed interval of the clock that drives this session.
    ///
    /// Typewriter cadence derives from `speed` (speed 20 → 50ms per tick);
    /// fade cadence is `segment_delay`. Never zero.
    pub fn tick_interval(&self) -> Duration {
        match self.mode {
            RevealMode::Typewriter => {
                Duration::from_millis(1000 / u64::from(self.speed.clamp(1, 100)))
            }
            RevealMode::Fade => self.segment_delay.max(Duration::from_millis(1)),
        }
    }
}

/// One reveal session: the lifetime of progressively displaying a single
/// text source, from reset to completion or replacement.
///
/// Invariants upheld throughout:
///
/// - the revealed text is always a prefix of the buffer accumulated so far;
/// - the cursor never exceeds the buffer length;
/// - [`ChangeFlags::COMPLETED`] is reported at most once, and only after the
///   stream has finished and the buffer is fully revealed.
///
/// A session never survives its source: replacing the source means
/// constructing a fresh session, discarding partial progress even when the
/// new content is equal.
#[derive(Debug)]
pub struct RevealSession {
    source_id: SourceId,
    options: RevealOptions,
    /// Text accumulated from the source so far.
    buffer: String,
    /// Byte offset of the end of the revealed prefix.
    cursor: usize,
    /// Fade-mode segments over `buffer`. Empty in typewriter mode.
    segments: Vec<Segment>,
    /// Number of segments revealed so far.
    revealed_segments: usize,
    stream_finished: bool,
    reveal_finished: bool,
}

impl RevealSession {
    /// Start a session for `source`.
    ///
    /// A static source is treated as a single already-complete fragment;
    /// in fade mode it is pre-chunked into word groups. An empty static
    /// source is already complete at construction. A streaming source
    /// starts empty; feed it via
    /// [`push_fragment`](Self::push_fragment) and
    /// [`finish_stream`](Self::finish_stream) as events arrive.
    pub fn new(source: &TextSource, options: RevealOptions) -> Self {
        let mut session = Self {
            source_id: source.id(),
            options,
            buffer: String::new(),
            cursor: 0,
            segments: Vec::new(),
            revealed_segments: 0,
            stream_finished: false,
            reveal_finished: false,
        };

        if let Some(text) = source.static_text() {
            session.buffer.push_str(text);
            if session.options.mode == RevealMode::Fade {
                session.segments = chunk_words(&session.buffer);
            }
            session.stream_finished = true;
            session.reveal_finished = session.buffer.is_empty();
        }

        session
    }

    /// Append an arriving fragment to the buffer.
    ///
    /// Buffering alone changes nothing visible, so this normally returns
    /// empty flags; the revealed prefix only grows on [`tick`](Self::tick).
    /// Fragments arriving after the stream finished belong to an abandoned
    /// producer and are ignored.
    pub fn push_fragment(&mut self, fragment: &str) -> ChangeFlags {
        if self.stream_finished || fragment.is_empty() {
            return ChangeFlags::empty();
        }

        let start = self.buffer.len();
        self.buffer.push_str(fragment);
        if self.options.mode == RevealMode::Fade {
            self.segments.push(Segment::new(start..self.buffer.len()));
        }
        ChangeFlags::empty()
    }

    /// Mark the source as finished producing.
    ///
    /// If the buffer is already fully revealed this completes the session;
    /// otherwise reveal keeps draining at the configured cadence and
    /// completion is deferred to the tick that catches up.
    pub fn finish_stream(&mut self) -> ChangeFlags {
        if self.stream_finished {
            return ChangeFlags::empty();
        }

        self.stream_finished = true;
        ChangeFlags::STREAM_ENDED | self.check_completion()
    }

    /// Advance the reveal clock by one tick.
    ///
    /// Typewriter mode advances the cursor by
    /// [`chunk_size`](RevealOptions::chunk_size) grapheme clusters; fade
    /// mode reveals the next buffered segment. A tick with nothing buffered
    /// beyond the cursor reveals nothing and returns empty flags: a missed
    /// or idle tick delays reveal, it never skips ahead.
    pub fn tick(&mut self) -> ChangeFlags {
        if self.reveal_finished {
            return ChangeFlags::empty();
        }

        let mut flags = match self.options.mode {
            RevealMode::Typewriter => self.advance_clusters(),
            RevealMode::Fade => self.advance_segment(),
        };
        flags |= self.check_completion();
        flags
    }

    /// Advance up to `chunk_size` grapheme clusters past the cursor.
    fn advance_clusters(&mut self) -> ChangeFlags {
        let chunk = self.options.chunk_size.max(1);
        let tail = &self.buffer[self.cursor..];
        let bytes: usize = tail.graphemes(true).take(chunk).map(str::len).sum();

        if bytes == 0 {
            return ChangeFlags::empty();
        }
        self.cursor += bytes;
        ChangeFlags::TEXT
    }

    /// Reveal the next buffered segment, if any.
    fn advance_segment(&mut self) -> ChangeFlags {
        let Some(segment) = self.segments.get(self.revealed_segments) else {
            return ChangeFlags::empty();
        };

        self.cursor = segment.end;
        self.revealed_segments += 1;
        ChangeFlags::TEXT | ChangeFlags::SEGMENT
    }

    /// Completion requires both: stream finished and buffer drained.
    fn check_completion(&mut self) -> ChangeFlags {
        if !self.reveal_finished && self.stream_finished && self.cursor == self.buffer.len() {
            self.reveal_finished = true;
            return ChangeFlags::COMPLETED;
        }
        ChangeFlags::empty()
    }

    /// The revealed prefix of the accumulated text.
    pub fn revealed_text(&self) -> &str {
        &self.buffer[..self.cursor]
    }

    /// All text accumulated from the source so far.
    pub fn full_text(&self) -> &str {
        &self.buffer
    }

    /// Byte offset of the end of the revealed prefix.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Identity of the source this session reveals.
    pub const fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Whether the source has finished producing.
    pub const fn is_stream_finished(&self) -> bool {
        self.stream_finished
    }

    /// Whether the session has fully revealed a finished source.
    pub const fn is_finished(&self) -> bool {
        self.reveal_finished
    }

    /// All segments known so far (fade mode; empty in typewriter mode).
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The segments revealed so far, in reveal order.
    pub fn revealed(&self) -> &[Segment] {
        &self.segments[..self.revealed_segments]
    }

    /// The session configuration.
    pub const fn options(&self) -> &RevealOptions {
        &self.options
    }
}
