//! Raw ADC channel

use super::{set_period_or_pin, Producer, Sampler};
use crate::config::{Configurable, ParamValue};
use crate::errors::{ConfigResult, ReadResult};
use crate::node::{Emitter, Observable};
use crate::time::Timestamp;

/// Emits the raw ADC count of one pin every period
///
/// Conversion to volts is left to [`AnalogVoltage`](crate::AnalogVoltage)
/// so the raw count stays observable.
pub struct AnalogInput {
    pin: u8,
    sampler: Sampler<u16>,
}

impl AnalogInput {
    /// Channel on `pin`, read through `read`
    pub fn new(pin: u8, period_ms: u64, read: impl FnMut() -> ReadResult<u16> + 'static) -> Self {
        Self { pin, sampler: Sampler::new(period_ms, read) }
    }

    /// GPIO number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Reads that produced no sample
    pub fn failures(&self) -> u64 {
        self.sampler.failures()
    }
}

impl Producer for AnalogInput {
    fn name(&self) -> &'static str {
        "AnalogInput"
    }

    fn period_ms(&self) -> u64 {
        self.sampler.period_ms
    }

    fn fire(&mut self, _now: Timestamp) {
        self.sampler.sample("AnalogInput");
    }
}

impl Emitter for AnalogInput {
    type Output = u16;

    fn observable(&self) -> &Observable<u16> {
        self.sampler.output()
    }

    fn observable_mut(&mut self) -> &mut Observable<u16> {
        self.sampler.output_mut()
    }
}

impl Configurable for AnalogInput {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ConfigError, ReadError};

    #[test]
    fn emits_raw_count() {
        let mut adc = AnalogInput::new(36, 2000, || Ok(2048));
        adc.fire(2000);
        assert_eq!(adc.last_value(), Some(&2048));
    }

    #[test]
    fn failed_conversion_is_withheld() {
        let mut adc = AnalogInput::new(36, 2000, || Err(ReadError::Bus("adc busy")));
        adc.fire(2000);
        assert!(adc.last_value().is_none());
        assert_eq!(adc.failures(), 1);
    }

    #[test]
    fn pin_is_read_only() {
        let mut adc = AnalogInput::new(36, 2000, || Ok(0));
        assert_eq!(adc.get_param("pin"), Some(ParamValue::Int(36)));
        assert_eq!(
            adc.set_param("pin", &ParamValue::Int(39)),
            Err(ConfigError::ReadOnly("pin"))
        );
    }
}
