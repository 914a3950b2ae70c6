//! Auto-Sizing Disclosure: an animated open/close container that tracks
//! the measured size of growing content.
//!
//! Three pieces compose here:
//!
//! 1. [`MeasuredRegion`]: a subscribable "natural size of a region"
//!    primitive the host feeds from whatever measurement its platform
//!    offers. Observation is a scoped acquisition: the [`Subscription`]
//!    guard releases the registration on every exit path.
//!
//! 2. [`AnimatedExtent`]: an eased value heading toward a retargetable
//!    goal over a bounded duration, never snapping on mid-flight changes.
//!
//! 3. [`Disclosure`]: the panel itself, with exclusive controlled or
//!    uncontrolled ownership of the open flag, extent targeted at the
//!    content measure while open and at zero while closed, and explicit
//!    [`Trigger`] handles for controls.
//!
//! Composition with the reveal engine needs no coordination: the reveal
//! session keeps revealing regardless of the open flag, the host measures
//! whatever it renders, and the panel follows the measure. Closing
//! mid-stream collapses only the visible extent; reveal progress is
//! preserved.

mod extent;
mod observe;
mod panel;

pub use extent::{AnimatedExtent, Easing};
pub use observe::{MeasuredRegion, Subscription};
pub use panel::{Disclosure, DisclosureConfig, Trigger};
