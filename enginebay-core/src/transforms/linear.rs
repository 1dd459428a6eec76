//! Linear calibration: `multiplier · x + offset`

use alloc::string::String;

use super::Transform;
use crate::config::{Configurable, ParamValue};
use crate::errors::{ConfigError, ConfigResult};

/// Affine calibration of a float signal
///
/// ```rust
/// use enginebay_core::Linear;
///
/// // Sender reads 0.9 K low
/// let calibrate = Linear::new(1.0, 0.9);
/// assert!((calibrate.convert(10.0) - 10.9).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    multiplier: f32,
    offset: f32,
}

impl Linear {
    /// `multiplier · x + offset`
    pub fn new(multiplier: f32, offset: f32) -> Self {
        Self { multiplier, offset }
    }

    /// Pass-through (gain 1, offset 0), kept as a calibration hook
    pub fn identity() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Apply the calibration
    pub fn convert(&self, input: f32) -> f32 {
        self.multiplier * input + self.offset
    }

    /// Gain
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Offset
    pub fn offset(&self) -> f32 {
        self.offset
    }
}

impl Default for Linear {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform for Linear {
    type Input = f32;
    type Output = f32;

    fn name(&self) -> &'static str {
        "Linear"
    }

    fn apply(&mut self, input: f32) -> Option<f32> {
        Some(self.convert(input))
    }
}

impl Configurable for Linear {
    fn param_keys(&self) -> &'static [&'static str] {
        &["multiplier", "offset"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "multiplier" => Some(self.multiplier.into()),
            "offset" => Some(self.offset.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "multiplier" => self.multiplier = value.expect_finite("multiplier")?,
            "offset" => self.offset = value.expect_finite("offset")?,
            _ => return Err(ConfigError::UnknownParam(String::from(key))),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_offset() {
        let linear = Linear::new(1.0, 0.9);
        assert!((linear.convert(10.0) - 10.9).abs() < 1e-6);
    }

    #[test]
    fn repeated_conversion_is_identical() {
        let mut linear = Linear::new(2.5, -3.0);
        let first = linear.apply(17.25);
        for _ in 0..10 {
            assert_eq!(linear.apply(17.25), first);
        }
    }

    #[test]
    fn identity_passes_through() {
        assert_eq!(Linear::identity().convert(351.15), 351.15);
    }

    #[test]
    fn parameters_can_be_overridden() {
        let mut linear = Linear::default();
        linear.set_param("offset", &ParamValue::Float(-0.5)).unwrap();
        assert_eq!(linear.convert(1.0), 0.5);
        assert!(matches!(
            linear.set_param("slope", &ParamValue::Float(1.0)),
            Err(ConfigError::UnknownParam(_))
        ));
    }
}
