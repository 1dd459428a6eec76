//! Polled digital level

use super::{set_period_or_pin, Producer, Sampler};
use crate::config::{Configurable, ParamValue};
use crate::errors::{ConfigResult, ReadResult};
use crate::node::{Emitter, Observable};
use crate::time::Timestamp;

/// Emits the level of one digital pin every period
pub struct DigitalInputState {
    pin: u8,
    sampler: Sampler<bool>,
}

impl DigitalInputState {
    /// Input on `pin`, read through `read`
    pub fn new(pin: u8, period_ms: u64, read: impl FnMut() -> ReadResult<bool> + 'static) -> Self {
        Self { pin, sampler: Sampler::new(period_ms, read) }
    }

    /// GPIO number
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl Producer for DigitalInputState {
    fn name(&self) -> &'static str {
        "DigitalInputState"
    }

    fn period_ms(&self) -> u64 {
        self.sampler.period_ms
    }

    fn fire(&mut self, _now: Timestamp) {
        self.sampler.sample("DigitalInputState");
    }
}

impl Emitter for DigitalInputState {
    type Output = bool;

    fn observable(&self) -> &Observable<bool> {
        self.sampler.output()
    }

    fn observable_mut(&mut self) -> &mut Observable<bool> {
        self.sampler.output_mut()
    }
}

impl Configurable for DigitalInputState {
    fn param_keys(&self) -> &'static [&'static str] {
        &["pin", "period_ms"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "pin" => Some(ParamValue::Int(i64::from(self.pin))),
            "period_ms" => Some(self.sampler.period_ms.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        set_period_or_pin(&mut self.sampler.period_ms, key, value)
    }
}
