//! Interrupt-Fed Pulse Counting
//!
//! ## Overview
//!
//! Flywheel teeth and flow-meter vanes produce edges faster than any
//! scheduler period. Each edge is counted in interrupt context; on its own
//! period the [`DigitalInputCounter`] drains the count and emits it together
//! with the length of the window it covers.
//!
//! ```text
//! GPIO ISR                         Scheduler thread
//!    ↓                                   ↓
//! record_edge() ──→ AtomicU32 ←── drain() = swap(0)
//!    ↓                                   ↓
//! fetch_add only                  PulseCount { count, window_ms }
//! ```
//!
//! ## Drain Invariant
//!
//! `drain` is a single `swap(0)`, never a load followed by a store. Every
//! increment lands either in the value returned by this drain or in the
//! counter left for the next one, so drained counts summed over any run
//! equal the recorded edges.
//!
//! ## Memory Ordering
//!
//! - **Relaxed** on `record_edge`: the count carries no other data
//! - **AcqRel** on `drain`: orders the window boundary against the
//!   scheduler's own timestamp bookkeeping
//!
//! The interrupt side touches nothing but the counter.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use super::{set_period_or_pin, Producer};
use crate::config::{Configurable, ParamValue};
use crate::errors::ConfigResult;
use crate::node::{Emitter, Observable};
use crate::time::Timestamp;
use crate::value::Value;

/// Edge count shared between an interrupt handler and the scheduler
///
/// `new` is `const`, so the counter can live in a `static` when the
/// interrupt handler cannot capture an `Arc`:
///
/// ```rust
/// use enginebay_core::EdgeCounter;
///
/// static FLYWHEEL: EdgeCounter = EdgeCounter::new();
///
/// fn on_rising_edge() {
///     FLYWHEEL.record_edge();
/// }
///
/// on_rising_edge();
/// on_rising_edge();
/// assert_eq!(FLYWHEEL.drain(), 2);
/// assert_eq!(FLYWHEEL.drain(), 0);
/// ```
#[derive(Debug, Default)]
pub struct EdgeCounter {
    count: AtomicU32,
}

impl EdgeCounter {
    /// Counter at zero
    pub const fn new() -> Self {
        Self { count: AtomicU32::new(0) }
    }

    /// Count one qualifying edge; the only call allowed from interrupt context
    #[inline]
    pub fn record_edge(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Take the count accumulated since the previous drain and reset it
    #[inline]
    pub fn drain(&self) -> u32 {
        self.count.swap(0, Ordering::AcqRel)
    }

    /// Edges recorded since the last drain, without resetting
    pub fn pending(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Pulses counted over one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseCount {
    /// Edges in the window
    pub count: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl From<PulseCount> for Value {
    fn from(window: PulseCount) -> Self {
        Value::Int(i64::from(window.count))
    }
}

/// Emits the pulses counted on one pin during each period
///
/// The emitted window length is measured from the previous drain, so a late
/// tick yields a longer window with proportionally more pulses and the rate
/// derived downstream stays correct. Starting the pipeline drains the
/// counter and opens the first window.
pub struct DigitalInputCounter {
    pin: u8,
    period_ms: u64,
    counter: Arc<EdgeCounter>,
    last_drain: Option<Timestamp>,
    output: Observable<PulseCount>,
}

impl DigitalInputCounter {
    /// Counter for `pin`, drained every `period_ms`
    ///
    /// The interrupt handler keeps a clone of `counter`; use
    /// [`counter`](Self::counter) to obtain one after construction.
    pub fn new(pin: u8, period_ms: u64, counter: Arc<EdgeCounter>) -> Self {
        Self { pin, period_ms, counter, last_drain: None, output: Observable::new() }
    }

    /// Handle for the interrupt side
    pub fn counter(&self) -> Arc<EdgeCounter> {
        Arc::clone(&self.counter)
    }

    /// GPIO number
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl Producer for DigitalInputCounter {
    fn name(&self) -> &'static str {
        "DigitalInputCounter"
    }

    fn period_ms(&self) -> u64 {
        self.period_ms
    }

    fn start(&mut self, now: Timestamp) {
        // Edges seen before start belong to no window
        let stale = self.counter.drain();
        if stale > 0 {
            log_debug!("pin {}: discarded {} edge(s) recorded before start", self.pin, stale);
        }
        self.last_drain = Some(now);
    }

    fn fire(&mut self, now: Timestamp) {
        let count = self.counter.drain();
        let window_ms = match self.last_drain {
            Some(previous) => now.saturating_sub(previous),
            None => self.period_ms,
        };
        self.last_drain = Some(now);
        self.output.emit(PulseCount { count, window_ms });
    }
}

impl Emitter for DigitalInputCounter {
    type Output = PulseCount;

    fn observable(&self) -> &Observable<PulseCount> {
        &self.output
    }

    fn observable_mut(&mut self) -> &mut Observable<PulseCount> {
        &mut self.output
    }
}

impl Configurable for DigitalInputCounter {
    fn param_keys(&self) -> &'static [&'static str] {
        &["pin", "period_ms"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "pin" => Some(ParamValue::Int(i64::from(self.pin))),
            "period_ms" => Some(self.period_ms.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        set_period_or_pin(&mut self.period_ms, key, value)
    }
}
