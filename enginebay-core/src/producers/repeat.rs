//! Closure-driven periodic sensors

use alloc::string::String;

use super::{Producer, Sampler};
use crate::config::{Configurable, ParamValue};
use crate::constants::{DEFAULT_SAMPLE_INTERVAL_MS, MS_PER_SECOND};
use crate::errors::{ConfigError, ConfigResult, ReadResult};
use crate::node::{Emitter, Observable};
use crate::time::Timestamp;
use crate::value::Validatable;

/// Calls a sampling function every period and emits what it returns
///
/// The closure owns whatever driver handle it reads from:
///
/// ```rust
/// use enginebay_core::{ReadError, RepeatSensor};
///
/// struct Bme280 { pressure_pa: Option<f32> }
/// let mut bme = Bme280 { pressure_pa: Some(101_325.0) };
///
/// let pressure = RepeatSensor::new("engine bay pressure", 10_000, move || {
///     bme.pressure_pa.ok_or(ReadError::NotResponding)
/// });
/// # let _ = pressure;
/// ```
pub struct RepeatSensor<T> {
    name: &'static str,
    sampler: Sampler<T>,
}

impl<T: Validatable + Clone + 'static> RepeatSensor<T> {
    /// Sensor named `name` firing every `period_ms`
    pub fn new(
        name: &'static str,
        period_ms: u64,
        read: impl FnMut() -> ReadResult<T> + 'static,
    ) -> Self {
        Self { name, sampler: Sampler::new(period_ms, read) }
    }

    /// Reads that produced no sample
    pub fn failures(&self) -> u64 {
        self.sampler.failures()
    }
}

impl<T: Validatable + Clone + 'static> Producer for RepeatSensor<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn period_ms(&self) -> u64 {
        self.sampler.period_ms
    }

    fn fire(&mut self, _now: Timestamp) {
        self.sampler.sample(self.name);
    }
}

impl<T: Validatable + Clone + 'static> Emitter for RepeatSensor<T> {
    type Output = T;

    fn observable(&self) -> &Observable<T> {
        self.sampler.output()
    }

    fn observable_mut(&mut self) -> &mut Observable<T> {
        self.sampler.output_mut()
    }
}

impl<T> Configurable for RepeatSensor<T> {
    fn param_keys(&self) -> &'static [&'static str] {
        &["period_ms"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "period_ms" => Some(self.sampler.period_ms.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "period_ms" => {
                self.sampler.period_ms = value.expect_positive_int("period_ms")?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownParam(String::from(key))),
        }
    }
}

/// Seconds since the clock epoch (device boot)
pub struct UptimeSensor {
    period_ms: u64,
    output: Observable<f32>,
}

impl UptimeSensor {
    /// Uptime reported every `period_ms`
    pub fn new(period_ms: u64) -> Self {
        Self { period_ms, output: Observable::new() }
    }
}

impl Default for UptimeSensor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL_MS)
    }
}

impl Producer for UptimeSensor {
    fn name(&self) -> &'static str {
        "Uptime"
    }

    fn period_ms(&self) -> u64 {
        self.period_ms
    }

    fn fire(&mut self, now: Timestamp) {
        self.output.emit(now as f32 / MS_PER_SECOND as f32);
    }
}

impl Emitter for UptimeSensor {
    type Output = f32;

    fn observable(&self) -> &Observable<f32> {
        &self.output
    }

    fn observable_mut(&mut self) -> &mut Observable<f32> {
        &mut self.output
    }
}

impl Configurable for UptimeSensor {
    fn param_keys(&self) -> &'static [&'static str] {
        &["period_ms"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "period_ms" => Some(self.period_ms.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "period_ms" => {
                self.period_ms = value.expect_positive_int("period_ms")?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownParam(String::from(key))),
        }
    }
}
