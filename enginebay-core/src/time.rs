//! Clock abstraction for the scheduler
//!
//! The scheduler only needs a monotonic millisecond counter. Sources:
//! - `MonotonicTime`: std `Instant`, counted from construction
//! - `ClockFn`: wraps a hardware millis() function on bare-metal targets
//! - `ManualTime`: shared, hand-advanced clock for tests and replays

use alloc::rc::Rc;
use core::cell::Cell;

/// Milliseconds since an arbitrary epoch (device boot for monotonic sources)
pub type Timestamp = u64;

/// Monotonic millisecond clock
///
/// The scheduler's due-time grid assumes readings never decrease; a wall
/// clock that can be stepped backwards is not a valid source.
pub trait TimeSource {
    /// Get current timestamp in milliseconds; must never go backwards
    fn now(&self) -> Timestamp;
}

/// Monotonic time source backed by `std::time::Instant`
///
/// Starts at 0 on construction, never goes backwards.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Time source reading a platform millisecond counter
///
/// ```rust
/// use enginebay_core::time::{ClockFn, TimeSource};
///
/// let clock = ClockFn::new(|| 42);
/// assert_eq!(clock.now(), 42);
/// ```
pub struct ClockFn<F> {
    read: F,
}

impl<F: Fn() -> Timestamp> ClockFn<F> {
    /// Wrap a millis() style function
    pub fn new(read: F) -> Self {
        Self { read }
    }
}

impl<F: Fn() -> Timestamp> TimeSource for ClockFn<F> {
    fn now(&self) -> Timestamp {
        (self.read)()
    }
}

/// Hand-advanced clock for testing
///
/// Clones share the same instant, so a test can keep one handle while the
/// scheduler owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Timestamp>>,
}

impl ManualTime {
    /// Clock reading `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { now: Rc::new(Cell::new(timestamp)) }
    }

    /// Jump to an absolute time
    pub fn set(&self, timestamp: Timestamp) {
        self.now.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
