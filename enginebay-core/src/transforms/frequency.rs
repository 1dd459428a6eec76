//! Pulse count to rate
//!
//! A `DigitalInputCounter` window carries its pulse count and its measured
//! duration. The rate is `count / seconds · multiplier`; the multiplier
//! turns raw edges per second into the physical quantity. With 11 flywheel
//! pulses per revolution, `multiplier = 1/11` gives revolutions per second.

use alloc::string::String;

use super::Transform;
use crate::config::{Configurable, ParamValue};
use crate::constants::MS_PER_SECOND;
use crate::errors::{ConfigError, ConfigResult};
use crate::producers::PulseCount;

/// `count / window_seconds · multiplier`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frequency {
    multiplier: f32,
}

impl Frequency {
    /// Rate converter scaled by `multiplier`
    pub fn new(multiplier: f32) -> Self {
        Self { multiplier }
    }

    /// Rate for one window, `None` for an empty window duration
    pub fn convert(&self, window: PulseCount) -> Option<f32> {
        if window.window_ms == 0 {
            return None;
        }
        let seconds = window.window_ms as f32 / MS_PER_SECOND as f32;
        Some(window.count as f32 / seconds * self.multiplier)
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Transform for Frequency {
    type Input = PulseCount;
    type Output = f32;

    fn name(&self) -> &'static str {
        "Frequency"
    }

    fn apply(&mut self, window: PulseCount) -> Option<f32> {
        self.convert(window)
    }
}

impl Configurable for Frequency {
    fn param_keys(&self) -> &'static [&'static str] {
        &["multiplier"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "multiplier" => Some(self.multiplier.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "multiplier" => {
                self.multiplier = value.expect_finite("multiplier")?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownParam(String::from(key))),
        }
    }
}
