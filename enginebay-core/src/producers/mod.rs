//! Sample sources
//!
//! Producers originate samples. The periodic ones own a sampling closure that
//! captures its driver handle (ADC channel, I2C device, 1-Wire ROM) and are
//! fired by the scheduler; [`DigitalInputCounter`] is fed by an interrupt
//! handler through an [`EdgeCounter`] and drained on its period.
//!
//! A failed or implausible read withholds the sample for that cycle. No
//! stale or zeroed value is pushed downstream.

use alloc::boxed::Box;
use alloc::string::String;

use crate::config::ParamValue;
use crate::errors::{ConfigError, ConfigResult, ReadResult};
use crate::node::Observable;
use crate::time::Timestamp;
use crate::value::Validatable;

pub mod analog;
pub mod counter;
pub mod digital;
pub mod repeat;

pub use analog::AnalogInput;
pub use counter::{DigitalInputCounter, EdgeCounter, PulseCount};
pub use digital::DigitalInputState;
pub use repeat::{RepeatSensor, UptimeSensor};

/// A scheduler-fired source of samples
pub trait Producer {
    /// Node name for logs and topology listings
    fn name(&self) -> &'static str;

    /// Current firing period in milliseconds
    fn period_ms(&self) -> u64;

    /// Sample once and push the result downstream
    fn fire(&mut self, now: Timestamp);

    /// Called once when the pipeline is started, before the first firing
    fn start(&mut self, _now: Timestamp) {}
}

/// Boxed sampling closure
pub type SampleFn<T> = Box<dyn FnMut() -> ReadResult<T>>;

/// Shared state of the closure-driven producers
pub(crate) struct Sampler<T> {
    pub(crate) period_ms: u64,
    read: SampleFn<T>,
    output: Observable<T>,
    failures: u64,
}

impl<T: Validatable + Clone + 'static> Sampler<T> {
    pub(crate) fn new(period_ms: u64, read: impl FnMut() -> ReadResult<T> + 'static) -> Self {
        Self { period_ms, read: Box::new(read), output: Observable::new(), failures: 0 }
    }

    pub(crate) fn sample(&mut self, name: &'static str) {
        match (self.read)() {
            Ok(value) if value.is_valid() => self.output.emit(value),
            Ok(_) => {
                self.failures += 1;
                log_warn!("{}: implausible reading withheld", name);
            }
            Err(err) => {
                self.failures += 1;
                log_debug!("{}: no sample ({})", name, err);
            }
        }
    }

    pub(crate) fn failures(&self) -> u64 {
        self.failures
    }

    pub(crate) fn output(&self) -> &Observable<T> {
        &self.output
    }

    pub(crate) fn output_mut(&mut self) -> &mut Observable<T> {
        &mut self.output
    }
}

/// Shared `Configurable` body for producers with `period_ms` and a read-only `pin`
pub(crate) fn set_period_or_pin(
    period_ms: &mut u64,
    key: &str,
    value: &ParamValue,
) -> ConfigResult<()> {
    match key {
        "period_ms" => {
            *period_ms = value.expect_positive_int("period_ms")?;
            Ok(())
        }
        "pin" => Err(ConfigError::ReadOnly("pin")),
        _ => Err(ConfigError::UnknownParam(String::from(key))),
    }
}
