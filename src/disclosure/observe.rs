//! Size observation: a subscribable "natural size of a region" primitive.
//!
//! Hosts report the measured natural size of rendered content into a
//! [`MeasuredRegion`]; observers register callbacks and hold a
//! [`Subscription`] guard for as long as they want notifications. The
//! guard unregisters on drop, so release happens on every exit path,
//! whether normal teardown, panic unwind, or observer replacement.

use std::sync::{Arc, Mutex, Weak};

/// Callback invoked with the new size whenever the measure changes.
type SizeCallback = Box<dyn FnMut(f32) + Send>;

/// Shared state behind a measured region.
struct RegionInner {
    /// Most recently observed natural size.
    size: f32,
    /// Registered observers, keyed for targeted removal.
    subscribers: Vec<(u64, SizeCallback)>,
    /// Next subscription key.
    next_id: u64,
}

/// An observable measure of some content's natural size.
///
/// The region itself knows nothing about layout; whoever renders the
/// content measures it and calls [`set_size`](Self::set_size). Cloning
/// yields another handle to the same region.
#[derive(Clone)]
pub struct MeasuredRegion {
    inner: Arc<Mutex<RegionInner>>,
}

impl MeasuredRegion {
    /// Create a region with no content (natural size 0).
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegionInner {
                size: 0.0,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// The most recently observed natural size.
    pub fn size(&self) -> f32 {
        self.inner.lock().expect("measured region poisoned").size
    }

    /// Report a new measured size, notifying subscribers on change.
    ///
    /// Negative sizes are clamped to zero; reporting an unchanged size
    /// notifies nobody. Callbacks run on the reporting thread while the
    /// region is locked, so they must not call back into this region.
    pub fn set_size(&self, size: f32) {
        let size = size.max(0.0);
        let mut inner = self.inner.lock().expect("measured region poisoned");
        if (inner.size - size).abs() < f32::EPSILON {
            return;
        }
        inner.size = size;
        for (_, callback) in &mut inner.subscribers {
            callback(size);
        }
    }

    /// Register a size-change observer.
    ///
    /// The observer stays registered for the lifetime of the returned
    /// [`Subscription`]; it is not invoked with the current size at
    /// registration time (read [`size`](Self::size) for that).
    pub fn subscribe(&self, callback: impl FnMut(f32) + Send + 'static) -> Subscription {
        let mut inner = self.inner.lock().expect("measured region poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Box::new(callback)));
        Subscription {
            region: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of live subscriptions, for diagnostics and tests.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .expect("measured region poisoned")
            .subscribers
            .len()
    }
}

impl Default for MeasuredRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MeasuredRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasuredRegion")
            .field("size", &self.size())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Scoped handle to a size-observation registration.
///
/// Dropping the subscription unregisters the observer. Outliving the
/// region is harmless: the registration died with the region.
#[derive(Debug)]
pub struct Subscription {
    region: Weak<Mutex<RegionInner>>,
    id: u64,
}

impl Subscription {
    /// Explicitly release the registration (equivalent to dropping).
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.region.upgrade() {
            let mut inner = inner.lock().expect("measured region poisoned");
            inner.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}
