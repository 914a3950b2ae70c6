//! Actor Model: the timing and cancellation layer of the engine.
//!
//! This module implements the threaded side of the reveal engine using
//! crossbeam channels:
//! - **Ticker Actor**: fixed-interval clock generating reveal cadence
//! - **Reveal Driver**: selects over tick and fragment events, pumps the
//!   session state machine, publishes snapshots to the host
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐        Tick         ┌──────────────┐
//! │ Ticker Thread│ ─────────────────▶  │              │
//! └──────────────┘                     │ Reveal Driver│ ──▶ Snapshot / on_complete
//! ┌──────────────┐     StreamEvent     │  (select!)   │
//! │   Producer   │ ─────────────────▶  │              │
//! └──────────────┘                     └──────────────┘
//! ```
//!
//! The two producers are independent: the driver makes no assumption about
//! how their cadences interleave. Dropping the driver cancels the clock and
//! detaches from the producer; late fragments are discarded at the channel.

mod driver;
mod ticker;

pub use driver::{RevealDriver, Snapshot};
pub use ticker::{Tick, TickerActor};
