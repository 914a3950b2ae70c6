//! # Unfurl
//!
//! A progressive text reveal and auto-sizing disclosure engine for
//! streaming UIs.
//!
//! Unfurl turns a static string or an in-flight token stream into a
//! time-ordered sequence of visible-text snapshots, and keeps a disclosure
//! container's animated extent tracking the measured size of content that
//! is still growing.
//!
//! ## Core Concepts
//!
//! - **Sessions over sources**: a [`RevealSession`] reveals exactly one
//!   [`TextSource`]; replacing the source starts over, even for equal text
//! - **Two producers, one state machine**: clock ticks and fragment
//!   arrivals drive the session independently, in any interleaving
//! - **Snapshots**: every visible change is published as an owned
//!   [`Snapshot`] with [`ChangeFlags`] describing what moved
//! - **Observed size, eased extent**: the disclosure subscribes to a
//!   [`MeasuredRegion`] and eases its visible extent toward the latest
//!   measure while open, toward zero while closed
//!
//! ## Example
//!
//! ```rust,ignore
//! use unfurl::{RevealDriver, RevealOptions, TextSource};
//!
//! let (sender, source) = TextSource::stream();
//! let driver = RevealDriver::spawn(
//!     source,
//!     RevealOptions::default(),
//!     |snapshot| println!("{}", snapshot.text),
//!     || println!("done"),
//! );
//! sender.send("Hello, ");
//! sender.send("world!");
//! sender.finish();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod disclosure;
pub mod measure;
pub mod reveal;

// Re-exports for convenience
pub use actor::{RevealDriver, Snapshot, Tick, TickerActor};
pub use disclosure::{
    AnimatedExtent, Disclosure, DisclosureConfig, Easing, MeasuredRegion, Subscription, Trigger,
};
pub use reveal::{
    ChangeFlags, FragmentSender, RevealMode, RevealOptions, RevealSession, Segment, SourceId,
    StreamEvent, TextSource,
};
