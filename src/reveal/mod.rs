//! Stream Reveal Engine: progressive disclosure of static or streaming text.
//!
//! This module converts a text source into a time-ordered sequence of
//! visible-text snapshots according to a reveal mode and speed, signalling
//! completion exactly once.
//!
//! # Architecture
//!
//! The reveal state machine is split from its clock so the core stays
//! synchronous and deterministic:
//!
//! 1. **Sources** ([`TextSource`]) are either a complete string or a
//!    fragment stream fed by a [`FragmentSender`]. Identity is
//!    per-instance: an equal string supplied again is a new session.
//!
//! 2. **Sessions** ([`RevealSession`]) consume two event kinds, fragment
//!    arrivals and clock ticks, and maintain the revealed prefix. They
//!    make no timing decisions of their own.
//!
//! 3. The threaded driver in [`crate::actor`] selects over a ticker and
//!    the fragment channel and pumps the session.
//!
//! # Example
//!
//! ```rust,ignore
//! use unfurl::reveal::{RevealOptions, RevealSession, TextSource};
//!
//! let source = TextSource::text("Hello");
//! let mut session = RevealSession::new(&source, RevealOptions::default());
//! session.tick();
//! assert_eq!(session.revealed_text(), "H");
//! ```

mod segment;
mod session;
mod source;

pub use segment::Segment;
pub use session::{ChangeFlags, RevealMode, RevealOptions, RevealSession};
pub use source::{FragmentSender, SourceId, StreamEvent, TextSource};

pub(crate) use source::SourceKind;
