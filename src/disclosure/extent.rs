//! Animated extent: eased interpolation toward a retargetable goal.
//!
//! The disclosure never snaps its visible extent. Every change of target
//! (a toggle, or the measured content growing mid-stream) starts a bounded
//! transition from the currently sampled value, so back-to-back retargets
//! stay smooth.
//!
//! Sampling takes an explicit [`Instant`] rather than reading the clock,
//! which keeps the math deterministic under test.

use std::time::{Duration, Instant};

/// Transition curve applied to the normalized progress of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant-rate interpolation.
    Linear,
    /// Fast start, decelerating finish.
    #[default]
    EaseOutCubic,
    /// Slow start and finish, fast middle.
    EaseInOutCubic,
}

impl Easing {
    /// Map normalized progress `t` (clamped to 0..=1) through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// A value animating toward a target over a bounded duration.
#[derive(Debug, Clone)]
pub struct AnimatedExtent {
    /// Value the current transition started from.
    start: f32,
    /// Value the current transition heads toward.
    target: f32,
    /// When the current transition began. `None` means settled.
    started_at: Option<Instant>,
    /// Bounded transition duration.
    duration: Duration,
    /// Transition curve.
    easing: Easing,
}

impl AnimatedExtent {
    /// Create an extent settled at `initial`.
    pub const fn new(initial: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            start: initial,
            target: initial,
            started_at: None,
            duration,
            easing,
        }
    }

    /// The value the extent is heading toward.
    pub const fn target(&self) -> f32 {
        self.target
    }

    /// The configured transition duration.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Start a transition toward `target`, beginning at `now`.
    ///
    /// The transition departs from the value sampled at `now`, so a
    /// retarget mid-flight continues smoothly instead of snapping.
    /// Retargeting the current target is a no-op.
    pub fn retarget(&mut self, now: Instant, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }
        self.start = self.value_at(now);
        self.target = target;
        self.started_at = Some(now);
    }

    /// Sample the animated value at `now`.
    pub fn value_at(&self, now: Instant) -> f32 {
        let Some(started_at) = self.started_at else {
            return self.target;
        };
        if self.duration.is_zero() {
            return self.target;
        }

        let elapsed = now.saturating_duration_since(started_at);
        if elapsed >= self.duration {
            return self.target;
        }

        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = self.easing.apply(t);
        (self.target - self.start).mul_add(eased, self.start)
    }

    /// Whether the transition has reached its target at `now`.
    pub fn is_settled_at(&self, now: Instant) -> bool {
        (self.value_at(now) - self.target).abs() < f32::EPSILON
    }
}
