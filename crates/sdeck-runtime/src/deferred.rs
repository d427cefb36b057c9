#![forbid(unsafe_code)]

//! Single-slot debounced action.
//!
//! Arming replaces whatever was pending, so only the most recent payload can
//! ever fire. Time is supplied by the caller; nothing here reads a clock.
//!
//! ```
//! use core::time::Duration;
//! use sdeck_runtime::deferred::DeferredAction;
//!
//! let mut slot = DeferredAction::new();
//! slot.arm(Duration::ZERO, Duration::from_secs(1), "#/a");
//! slot.arm(Duration::from_millis(200), Duration::from_secs(1), "#/b");
//! assert_eq!(slot.poll(Duration::from_millis(1100)), None);
//! assert_eq!(slot.poll(Duration::from_millis(1200)), Some("#/b"));
//! ```

use core::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending<T> {
    due: Duration,
    payload: T,
}

/// A payload that fires once its delay has elapsed, unless re-armed or cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredAction<T> {
    pending: Option<Pending<T>>,
}

impl<T> Default for DeferredAction<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredAction<T> {
    /// An idle slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Schedule `payload` at `now + delay`, returning the payload it replaced.
    pub fn arm(&mut self, now: Duration, delay: Duration, payload: T) -> Option<T> {
        let due = now.saturating_add(delay);
        self.pending
            .replace(Pending { due, payload })
            .map(|p| p.payload)
    }

    /// Drop the pending payload, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.payload)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending payload fires.
    #[must_use]
    pub fn due_at(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.due)
    }

    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.payload)
    }

    /// Take the payload if it is due at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            self.cancel()
        } else {
            None
        }
    }
}
