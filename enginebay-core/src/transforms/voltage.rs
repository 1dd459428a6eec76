//! Analog front-end conversions
//!
//! ```text
//!   Vin ──┬── R1 ──┬── R2 (sender) ── GND
//!                  │
//!                 ADC (Vout)
//! ```
//!
//! `AnalogVoltage` turns the ADC count into `Vout`; `VoltageDividerR2`
//! solves the divider for the sender resistance `R2 = R1·Vout / (Vin − Vout)`.

use alloc::string::String;

use super::Transform;
use crate::config::{Configurable, ParamValue};
use crate::constants::{ADC_MAX_12BIT, DIVIDER_MIN_HEADROOM_V, DIVIDER_R2_MAX_OHMS};
use crate::errors::{ConfigError, ConfigResult};

/// Raw ADC count to volts
///
/// `output = min(raw, adc_max) / adc_max · max_voltage · multiplier + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogVoltage {
    max_voltage: f32,
    multiplier: f32,
    offset: f32,
    adc_max: u16,
}

impl AnalogVoltage {
    /// Converter for a 12-bit ADC whose full scale reads `max_voltage`
    pub fn new(max_voltage: f32, multiplier: f32, offset: f32) -> Self {
        Self { max_voltage, multiplier, offset, adc_max: ADC_MAX_12BIT }
    }

    /// Use a different ADC full-scale count
    pub fn with_adc_max(mut self, adc_max: u16) -> Self {
        self.adc_max = adc_max.max(1);
        self
    }

    /// Convert one count
    pub fn convert(&self, raw: u16) -> f32 {
        let ratio = f32::from(raw.min(self.adc_max)) / f32::from(self.adc_max);
        ratio * self.max_voltage * self.multiplier + self.offset
    }
}

impl Transform for AnalogVoltage {
    type Input = u16;
    type Output = f32;

    fn name(&self) -> &'static str {
        "AnalogVoltage"
    }

    fn apply(&mut self, raw: u16) -> Option<f32> {
        Some(self.convert(raw))
    }
}

impl Configurable for AnalogVoltage {
    fn param_keys(&self) -> &'static [&'static str] {
        &["max_voltage", "multiplier", "offset", "adc_max"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "max_voltage" => Some(self.max_voltage.into()),
            "multiplier" => Some(self.multiplier.into()),
            "offset" => Some(self.offset.into()),
            "adc_max" => Some(ParamValue::Int(i64::from(self.adc_max))),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "max_voltage" => self.max_voltage = value.expect_finite("max_voltage")?,
            "multiplier" => self.multiplier = value.expect_finite("multiplier")?,
            "offset" => self.offset = value.expect_finite("offset")?,
            "adc_max" => {
                let count = value.expect_positive_int("adc_max")?;
                self.adc_max = u16::try_from(count).map_err(|_| ConfigError::InvalidValue {
                    key: "adc_max",
                    reason: "must fit in 16 bits",
                })?;
            }
            _ => return Err(ConfigError::UnknownParam(String::from(key))),
        }
        Ok(())
    }
}

/// Sender resistance from the voltage across it
///
/// Near `Vout = Vin` the denominator vanishes (open sender); the result is
/// clamped to `r2_max` instead of going infinite. `Vout ≤ 0` reads as a
/// shorted sender, 0 Ω.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageDividerR2 {
    r1: f32,
    vin: f32,
    r2_max: f32,
}

impl VoltageDividerR2 {
    /// Divider with fixed leg `r1` ohms fed from `vin` volts
    pub fn new(r1: f32, vin: f32) -> Self {
        Self { r1, vin, r2_max: DIVIDER_R2_MAX_OHMS }
    }

    /// Override the open-circuit clamp
    pub fn with_r2_max(mut self, r2_max: f32) -> Self {
        self.r2_max = r2_max;
        self
    }

    /// Solve for R2; `vout` must be finite
    pub fn convert(&self, vout: f32) -> f32 {
        if vout <= 0.0 {
            return 0.0;
        }
        let headroom = self.vin - vout;
        if headroom <= DIVIDER_MIN_HEADROOM_V {
            return self.r2_max;
        }
        (self.r1 * vout / headroom).min(self.r2_max)
    }
}

impl Transform for VoltageDividerR2 {
    type Input = f32;
    type Output = f32;

    fn name(&self) -> &'static str {
        "VoltageDividerR2"
    }

    fn apply(&mut self, vout: f32) -> Option<f32> {
        vout.is_finite().then(|| self.convert(vout))
    }
}

impl Configurable for VoltageDividerR2 {
    fn param_keys(&self) -> &'static [&'static str] {
        &["r1", "vin", "r2_max"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "r1" => Some(self.r1.into()),
            "vin" => Some(self.vin.into()),
            "r2_max" => Some(self.r2_max.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        let key: &'static str = match key {
            "r1" => "r1",
            "vin" => "vin",
            "r2_max" => "r2_max",
            _ => return Err(ConfigError::UnknownParam(String::from(key))),
        };
        let v = value.expect_finite(key)?;
        if v <= 0.0 {
            return Err(ConfigError::InvalidValue { key, reason: "must be positive" });
        }
        match key {
            "r1" => self.r1 = v,
            "vin" => self.vin = v,
            _ => self.r2_max = v,
        }
        Ok(())
    }
}
