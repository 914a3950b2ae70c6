//! Disclosure panel: an open/closed container whose visible extent tracks
//! its content's measured size.
//!
//! The panel owns no layout and renders nothing. It holds the open flag,
//! observes a [`MeasuredRegion`], and keeps an [`AnimatedExtent`] targeted
//! at the content size while open and at zero while closed. The host
//! applies the sampled extent to whatever clipped region it manages.
//!
//! Open-state ownership is exclusive per instance: an *uncontrolled* panel
//! owns the flag itself (defaulting to open), while a *controlled* panel
//! treats the caller's value as authoritative: toggle requests only
//! notify the caller, they never mutate.

use super::extent::{AnimatedExtent, Easing};
use super::observe::{MeasuredRegion, Subscription};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

/// Callback observing open-state change requests.
type OpenChangeFn = Box<dyn FnMut(bool) + Send>;

/// Configuration for a disclosure panel.
#[derive(Debug, Clone, Copy)]
pub struct DisclosureConfig {
    /// Bounded duration of the open/close and resize transitions.
    pub duration: Duration,
    /// Transition curve.
    pub easing: Easing,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::EaseOutCubic,
        }
    }
}

/// Who owns the open flag of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ownership {
    /// The panel owns and mutates the flag.
    Uncontrolled,
    /// The caller owns the flag; the panel only mirrors and notifies.
    Controlled,
}

/// Shared panel state, reachable from the owning [`Disclosure`] and any
/// [`Trigger`] handles derived from it.
struct PanelState {
    ownership: Ownership,
    open: bool,
    measured: f32,
    extent: AnimatedExtent,
    on_open_change: Option<OpenChangeFn>,
}

impl PanelState {
    /// Retarget the extent for the current open flag and measure.
    fn retarget(&mut self, now: Instant) {
        let target = if self.open { self.measured } else { 0.0 };
        self.extent.retarget(now, target);
    }
}

/// An auto-sizing disclosure container.
///
/// While open, every observed size change retargets the visible extent to
/// the new measure, including content that keeps growing because a reveal
/// session is still streaming into it. While closed, the extent targets
/// zero regardless of content size. Transitions are eased over the
/// configured bounded duration; mid-flight retargets never snap.
pub struct Disclosure {
    state: Arc<Mutex<PanelState>>,
    /// Live observation of the content region, if attached.
    subscription: Option<Subscription>,
}

impl Disclosure {
    /// Create an uncontrolled panel. Uncontrolled panels default to open.
    pub fn new(config: DisclosureConfig) -> Self {
        Self::build(Ownership::Uncontrolled, true, &config)
    }

    /// Create a controlled panel mirroring the caller-owned `open` value.
    ///
    /// The caller keeps the panel in sync via [`set_open`](Self::set_open);
    /// toggle requests from [`Trigger`]s only invoke the change observer.
    pub fn controlled(open: bool, config: DisclosureConfig) -> Self {
        Self::build(Ownership::Controlled, open, &config)
    }

    fn build(ownership: Ownership, open: bool, config: &DisclosureConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(PanelState {
                ownership,
                open,
                measured: 0.0,
                extent: AnimatedExtent::new(0.0, config.duration, config.easing),
                on_open_change: None,
            })),
            subscription: None,
        }
    }

    /// Whether the panel is controlled by the caller.
    pub fn is_controlled(&self) -> bool {
        self.lock().ownership == Ownership::Controlled
    }

    /// The current open flag.
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Authoritatively set the open flag.
    ///
    /// For a controlled panel this is the caller syncing its owned value
    /// in; for an uncontrolled panel it is a programmatic override. Either
    /// way the extent retargets (content size when opening, zero when
    /// closing) and the change observer is *not* invoked: it reports
    /// requests to the owner, not writes by the owner.
    pub fn set_open(&self, open: bool) {
        let mut state = self.lock();
        if state.open == open {
            return;
        }
        state.open = open;
        state.retarget(Instant::now());
    }

    /// Register the observer notified of open-state change requests.
    pub fn on_open_change(&self, callback: impl FnMut(bool) + Send + 'static) {
        self.lock().on_open_change = Some(Box::new(callback));
    }

    /// Request the open flag be set, as a trigger control would.
    ///
    /// Uncontrolled panels apply the request and notify; controlled panels
    /// only notify, leaving the reported flag untouched until the caller
    /// syncs it back in with [`set_open`](Self::set_open).
    pub fn request_open(&self, open: bool) {
        request_open_on(&self.state, open);
    }

    /// Request the open flag be flipped.
    pub fn toggle(&self) {
        let open = self.is_open();
        self.request_open(!open);
    }

    /// Observe `region` as the panel's content measure.
    ///
    /// The current measure is adopted immediately and every subsequent
    /// change retargets the extent while open. Attaching replaces (and
    /// releases) any previous observation; the new one is released on
    /// [`detach`](Self::detach) or drop.
    pub fn attach(&mut self, region: &MeasuredRegion) {
        let state = Arc::downgrade(&self.state);
        let subscription = region.subscribe(move |size| {
            if let Some(state) = state.upgrade() {
                let mut state = state.lock().expect("disclosure state poisoned");
                state.measured = size;
                if state.open {
                    state.retarget(Instant::now());
                }
            }
        });

        // Drop the previous observation only after the new one is live.
        self.subscription = Some(subscription);

        let mut state = self.lock();
        state.measured = region.size();
        state.retarget(Instant::now());
    }

    /// Release the content observation, if any.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// The most recently observed content size.
    pub fn measured_extent(&self) -> f32 {
        self.lock().measured
    }

    /// The extent value the panel is animating toward.
    pub fn extent_target(&self) -> f32 {
        self.lock().extent.target()
    }

    /// Sample the animated visible extent now.
    pub fn visible_extent(&self) -> f32 {
        self.visible_extent_at(Instant::now())
    }

    /// Sample the animated visible extent at `now`.
    pub fn visible_extent_at(&self, now: Instant) -> f32 {
        self.lock().extent.value_at(now)
    }

    /// Whether the extent has settled on its target at `now`.
    pub fn is_settled_at(&self, now: Instant) -> bool {
        self.lock().extent.is_settled_at(now)
    }

    /// Derive a control handle for this panel.
    pub fn trigger(&self) -> Trigger {
        Trigger {
            state: Arc::downgrade(&self.state),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PanelState> {
        self.state.lock().expect("disclosure state poisoned")
    }
}

impl std::fmt::Debug for Disclosure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Disclosure")
            .field("ownership", &state.ownership)
            .field("open", &state.open)
            .field("measured", &state.measured)
            .field("target", &state.extent.target())
            .finish()
    }
}

/// An explicit control handle for one disclosure panel.
///
/// Containers hand a trigger to every control that reads or requests the
/// open flag, making the relationship visible in the control's interface
/// instead of resolved through ambient context.
#[derive(Clone)]
pub struct Trigger {
    state: Weak<Mutex<PanelState>>,
}

impl Trigger {
    /// The current open flag of the panel.
    ///
    /// # Panics
    ///
    /// Panics if the disclosure has been torn down: a trigger outliving
    /// its panel is a wiring mistake by the integrator, not a runtime
    /// condition.
    pub fn is_open(&self) -> bool {
        self.state().lock().expect("disclosure state poisoned").open
    }

    /// Request the open flag be set (see [`Disclosure::request_open`]).
    ///
    /// # Panics
    ///
    /// Panics if the disclosure has been torn down.
    pub fn set_open(&self, open: bool) {
        request_open_on(&self.state(), open);
    }

    /// Request the open flag be flipped.
    ///
    /// # Panics
    ///
    /// Panics if the disclosure has been torn down.
    pub fn toggle(&self) {
        let open = self.is_open();
        self.set_open(!open);
    }

    fn state(&self) -> Arc<Mutex<PanelState>> {
        self.state
            .upgrade()
            .expect("disclosure trigger used after its panel was dropped")
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("attached", &(self.state.strong_count() > 0))
            .finish()
    }
}

/// Shared request path for [`Disclosure::request_open`] and [`Trigger`].
///
/// The change observer is taken out of the state and invoked after the
/// lock is released, so an observer may inspect the panel through other
/// handles without deadlocking.
fn request_open_on(state: &Mutex<PanelState>, open: bool) {
    let callback = {
        let mut state = state.lock().expect("disclosure state poisoned");
        if state.ownership == Ownership::Uncontrolled && state.open != open {
            state.open = open;
            state.retarget(Instant::now());
        }
        state.on_open_change.take()
    };

    if let Some(mut callback) = callback {
        callback(open);
        let mut state = state.lock().expect("disclosure state poisoned");
        // A fresh observer registered during the call wins.
        if state.on_open_change.is_none() {
            state.on_open_change = Some(callback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_uncontrolled_defaults_to_open() {
        let panel = Disclosure::new(DisclosureConfig::default());
        assert!(panel.is_open());
        assert!(!panel.is_controlled());
    }

    #[test]
    fn test_uncontrolled_toggle_mutates_and_notifies() {
        let panel = Disclosure::new(DisclosureConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        panel.on_open_change(move |open| seen_clone.lock().unwrap().push(open));

        panel.toggle();
        assert!(!panel.is_open());
        panel.toggle();
        assert!(panel.is_open());
        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn test_controlled_request_notifies_without_mutating() {
        let panel = Disclosure::controlled(true, DisclosureConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        panel.on_open_change(move |open| seen_clone.lock().unwrap().push(open));

        panel.toggle();
        // The reported flag is untouched; only the observer heard about it.
        assert!(panel.is_open());
        assert_eq!(*seen.lock().unwrap(), vec![false]);

        // The caller syncing its owned value in is what changes the flag.
        panel.set_open(false);
        assert!(!panel.is_open());
    }

    #[test]
    fn test_set_open_does_not_notify() {
        let panel = Disclosure::new(DisclosureConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        panel.on_open_change(move |_| {
            calls_clone.fetch_add(1, Ordering::Relaxed);
        });

        panel.set_open(false);
        panel.set_open(true);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_open_extent_tracks_latest_measure() {
        let region = MeasuredRegion::new();
        let mut panel = Disclosure::new(DisclosureConfig::default());
        panel.attach(&region);

        region.set_size(120.0);
        assert!((panel.extent_target() - 120.0).abs() < f32::EPSILON);

        // Content growing mid-stream retargets without another toggle.
        region.set_size(200.0);
        assert!((panel.extent_target() - 200.0).abs() < f32::EPSILON);
        assert!((panel.measured_extent() - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_closed_extent_targets_zero_regardless_of_measure() {
        let region = MeasuredRegion::new();
        let mut panel = Disclosure::new(DisclosureConfig::default());
        panel.attach(&region);
        panel.set_open(false);

        region.set_size(500.0);
        assert!((panel.extent_target() - 0.0).abs() < f32::EPSILON);
        // The measure is still tracked for the next open.
        assert!((panel.measured_extent() - 500.0).abs() < f32::EPSILON);

        panel.set_open(true);
        assert!((panel.extent_target() - 500.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_open_with_empty_content_targets_zero() {
        let region = MeasuredRegion::new();
        let mut panel = Disclosure::new(DisclosureConfig::default());
        panel.attach(&region);
        assert!(panel.is_open());
        assert!((panel.extent_target() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_attach_adopts_current_measure() {
        let region = MeasuredRegion::new();
        region.set_size(75.0);

        let mut panel = Disclosure::new(DisclosureConfig::default());
        panel.attach(&region);
        assert!((panel.extent_target() - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_toggle_animates_between_zero_and_measure() {
        let region = MeasuredRegion::new();
        let mut panel = Disclosure::controlled(false, DisclosureConfig::default());
        panel.attach(&region);
        region.set_size(120.0);
        assert!((panel.extent_target() - 0.0).abs() < f32::EPSILON);

        panel.set_open(true);
        let now = Instant::now();
        assert!((panel.extent_target() - 120.0).abs() < f32::EPSILON);
        assert!(
            panel.visible_extent_at(now + Duration::from_millis(300)) >= 120.0 - f32::EPSILON
        );
    }

    #[test]
    fn test_detach_releases_subscription() {
        let region = MeasuredRegion::new();
        let mut panel = Disclosure::new(DisclosureConfig::default());
        panel.attach(&region);
        assert_eq!(region.subscriber_count(), 1);

        panel.detach();
        assert_eq!(region.subscriber_count(), 0);

        // A detached panel no longer follows the measure.
        region.set_size(90.0);
        assert!((panel.extent_target() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let region = MeasuredRegion::new();
        let mut panel = Disclosure::new(DisclosureConfig::default());
        panel.attach(&region);
        assert_eq!(region.subscriber_count(), 1);

        drop(panel);
        assert_eq!(region.subscriber_count(), 0);
    }

    #[test]
    fn test_reattach_replaces_observation() {
        let first = MeasuredRegion::new();
        let second = MeasuredRegion::new();
        let mut panel = Disclosure::new(DisclosureConfig::default());

        panel.attach(&first);
        panel.attach(&second);
        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 1);
    }

    #[test]
    fn test_trigger_toggles_panel() {
        let panel = Disclosure::new(DisclosureConfig::default());
        let trigger = panel.trigger();

        assert!(trigger.is_open());
        trigger.toggle();
        assert!(!panel.is_open());
        trigger.set_open(true);
        assert!(panel.is_open());
    }

    #[test]
    #[should_panic(expected = "disclosure trigger used after its panel was dropped")]
    fn test_trigger_after_teardown_is_a_hard_fault() {
        let panel = Disclosure::new(DisclosureConfig::default());
        let trigger = panel.trigger();
        drop(panel);
        trigger.toggle();
    }

    #[test]
    fn test_observer_may_reenter_through_trigger() {
        // The change observer runs with the panel lock released, so a
        // controlled host can read state through another handle while
        // handling the request.
        let panel = Disclosure::controlled(true, DisclosureConfig::default());
        let trigger = panel.trigger();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        panel.on_open_change(move |open| {
            seen_clone.lock().unwrap().push((open, trigger.is_open()));
        });

        panel.toggle();
        assert_eq!(*seen.lock().unwrap(), vec![(false, true)]);
    }
}
