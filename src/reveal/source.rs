//! Text sources: static strings and streaming fragment sequences.
//!
//! A [`TextSource`] is the input side of a reveal session. It is either a
//! complete string or the receiving half of a fragment stream whose total
//! length is unknown until the producer finishes.
//!
//! Identity is per-instance, never content equality: every constructed
//! source gets a fresh [`SourceId`], so supplying an equal string again is
//! still a new reveal session.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing [`SourceId`] allocation.
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of one text source instance.
///
/// Two sources with identical content still have distinct ids; reveal
/// progress never carries over between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Events delivered by a streaming source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One atomically-delivered piece of the text, in source order.
    Fragment(String),

    /// The source has finished producing. No fragments follow.
    Finished,
}

/// Producer half of a streaming text source.
///
/// Fragments are buffered without blocking the producer; the reveal cadence
/// drains them independently. Dropping the sender without calling
/// [`finish`](Self::finish) also ends the sequence, since a vanished producer
/// cannot produce more. A sender that stays alive and silent leaves the
/// session perpetually unfinished, which is a valid state, not an error.
#[derive(Debug, Clone)]
pub struct FragmentSender {
    tx: Sender<StreamEvent>,
}

impl FragmentSender {
    /// Send the next fragment.
    ///
    /// Returns `false` if the consuming session has been torn down; the
    /// fragment is discarded in that case.
    pub fn send(&self, fragment: impl Into<String>) -> bool {
        self.tx.send(StreamEvent::Fragment(fragment.into())).is_ok()
    }

    /// Signal that the source is done producing.
    pub fn finish(self) {
        let _ = self.tx.send(StreamEvent::Finished);
    }
}

/// The kind of text a source delivers.
#[derive(Debug)]
pub(crate) enum SourceKind {
    /// A complete, immutable string (a single already-complete fragment).
    Static(String),
    /// An ordered fragment stream with unknown total length.
    Stream(Receiver<StreamEvent>),
}

/// A text input for the reveal engine: static or streaming.
#[derive(Debug)]
pub struct TextSource {
    id: SourceId,
    kind: SourceKind,
}

impl TextSource {
    /// Create a source from a complete string.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: SourceId::next(),
            kind: SourceKind::Static(content.into()),
        }
    }

    /// Create a streaming source together with its producer handle.
    pub fn stream() -> (FragmentSender, Self) {
        let (tx, rx) = unbounded();
        let source = Self {
            id: SourceId::next(),
            kind: SourceKind::Stream(rx),
        };
        (FragmentSender { tx }, source)
    }

    /// The unique identity of this source instance.
    pub const fn id(&self) -> SourceId {
        self.id
    }

    /// Whether this source is a complete string.
    pub const fn is_static(&self) -> bool {
        matches!(self.kind, SourceKind::Static(_))
    }

    /// The static content, if any.
    pub(crate) fn static_text(&self) -> Option<&str> {
        match &self.kind {
            SourceKind::Static(text) => Some(text),
            SourceKind::Stream(_) => None,
        }
    }

    /// Split the source into its identity and delivery mechanism.
    pub(crate) fn into_parts(self) -> (SourceId, SourceKind) {
        (self.id, self.kind)
    }
}

impl From<&str> for TextSource {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl From<String> for TextSource {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}
