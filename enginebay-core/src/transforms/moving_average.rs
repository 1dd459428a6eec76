//! Sliding-window average
//!
//! Emits on every input: `sum / count · scale` over the most recent `N`
//! samples. Before the window fills the average covers what has arrived so
//! far, so the first sample passes straight through (times `scale`).
//!
//! `scale` is a flat factor applied after averaging, not a decay weight.

use alloc::string::String;

use super::Transform;
use crate::buffer::SlidingWindow;
use crate::config::{Configurable, ParamValue};
use crate::constants::MAX_AVERAGE_WINDOW;
use crate::errors::{ConfigError, ConfigResult};

/// Mean of the last `N` samples, times `scale`
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: SlidingWindow<MAX_AVERAGE_WINDOW>,
    scale: f32,
}

impl MovingAverage {
    /// Average over `samples` inputs, clamped into `1..=MAX_AVERAGE_WINDOW`
    pub fn new(samples: usize, scale: f32) -> Self {
        Self { window: SlidingWindow::new(samples), scale }
    }

    /// Window length
    pub fn samples(&self) -> usize {
        self.window.limit()
    }

    /// Post-average factor
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Samples currently retained
    pub fn filled(&self) -> usize {
        self.window.len()
    }

    /// Drop retained history
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl Transform for MovingAverage {
    type Input = f32;
    type Output = f32;

    fn name(&self) -> &'static str {
        "MovingAverage"
    }

    fn apply(&mut self, input: f32) -> Option<f32> {
        // A NaN would poison the running sum for a full window
        if !input.is_finite() {
            return None;
        }
        self.window.push(input);
        self.window.mean().map(|mean| mean * self.scale)
    }
}

impl Configurable for MovingAverage {
    fn param_keys(&self) -> &'static [&'static str] {
        &["samples", "scale"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "samples" => Some(ParamValue::Int(self.samples() as i64)),
            "scale" => Some(self.scale.into()),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "samples" => {
                let samples = value.expect_positive_int("samples")?;
                if samples > MAX_AVERAGE_WINDOW as u64 {
                    return Err(ConfigError::InvalidValue {
                        key: "samples",
                        reason: "exceeds maximum window length",
                    });
                }
                self.window.set_limit(samples as usize);
            }
            "scale" => self.scale = value.expect_finite("scale")?,
            _ => return Err(ConfigError::UnknownParam(String::from(key))),
        }
        Ok(())
    }
}
