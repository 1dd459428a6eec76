//! Values crossing the sink boundary
//!
//! Inside the graph every edge is statically typed. At the sink the value is
//! handed to an external collaborator that accepts several shapes, so it is
//! folded into [`Value`].

use alloc::string::String;
use core::fmt;

/// A telemetry value as published under a semantic path
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Digital level or flag
    Bool(bool),
    /// Counts and raw ADC readings
    Int(i64),
    /// Calibrated physical quantity (SI units)
    Float(f32),
    /// Notification text
    Text(String),
}

impl Value {
    /// Numeric view, if the value is a number
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Text view, if the value is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(String::from(v))
    }
}

/// Plausibility check applied to every sampled value before it is emitted
pub trait Validatable {
    /// Check if the value is usable (not NaN, infinite, etc)
    fn is_valid(&self) -> bool;
}

impl Validatable for f32 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Validatable for f64 {
    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

macro_rules! always_valid {
    ($($ty:ty),*) => {
        $(impl Validatable for $ty {
            fn is_valid(&self) -> bool {
                true
            }
        })*
    };
}

always_valid!(bool, u8, u16, u32, i32, i64, String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_floats_are_invalid() {
        assert!(1.5_f32.is_valid());
        assert!(!f32::NAN.is_valid());
        assert!(!f32::INFINITY.is_valid());
        assert!(!f64::NEG_INFINITY.is_valid());
    }

    #[test]
    fn integer_values_read_as_numbers() {
        assert_eq!(Value::from(4095_u16).as_f32(), Some(4095.0));
        assert_eq!(Value::from(true).as_f32(), None);
        assert_eq!(Value::from("Bilge clear").as_str(), Some("Bilge clear"));
    }
}
