//! Piecewise-Linear Calibration Curves
//!
//! ## Motivation
//!
//! Resistive senders (coolant temperature, oil pressure) and flow
//! characteristics (fuel rate against RPM) are not linear and come with a
//! manufacturer table rather than a formula. A curve table reproduces the
//! datasheet directly and interpolates between its rows.
//!
//! ## Lookup
//!
//! ```text
//! output
//!   │ ●─────●
//!   │        ╲
//!   │         ●
//!   │          ╲          clamped
//!   │           ●─────●───────────
//!   └──────────────────────────── input
//!     x0    x1  x2    x3
//! ```
//!
//! - `x ≤ x0` returns `y0`, `x ≥ xn` returns `yn`: the sender range is the
//!   calibrated range, extrapolating past it invents data
//! - otherwise the bracketing pair `xi ≤ x < xi+1` is found by binary search
//!   and `y = yi + (x − xi)/(xi+1 − xi)·(yi+1 − yi)`
//!
//! ## Table Invariants
//!
//! Inputs are finite and strictly increasing. Points are validated on
//! insertion and a violating point is rejected, never sorted into place: an
//! out-of-order row almost always means a typo in the calibration data.
//!
//! Interpolation needs two points. Looking up a shorter table is an error
//! returned to the caller; `CurveInterpolator` logs it and withholds the
//! sample so only the misconfigured chain goes quiet.
//!
//! ## Usage Example
//!
//! ```rust
//! use enginebay_core::CurveTable;
//!
//! // Coolant sender: ohms → kelvin
//! let sender = CurveTable::from_points(&[(20.0, 393.15), (30.0, 383.15)])?;
//!
//! assert!((sender.lookup(25.0)? - 388.15).abs() < 1e-3);
//! assert_eq!(sender.lookup(10.0)?, 393.15);   // below range
//! assert_eq!(sender.lookup(100.0)?, 383.15);  // above range
//! # Ok::<(), enginebay_core::CurveError>(())
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use super::Transform;
use crate::config::{Configurable, ParamValue};
use crate::constants::MAX_CURVE_POINTS;
use crate::errors::{ConfigError, ConfigResult, CurveError};

/// One calibration row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Measured quantity
    pub input: f32,
    /// Calibrated quantity
    pub output: f32,
}

/// Ordered calibration rows with strictly increasing inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveTable {
    points: heapless::Vec<CurvePoint, MAX_CURVE_POINTS>,
}

impl CurveTable {
    /// Empty table; needs at least two points before lookups succeed
    pub fn new() -> Self {
        Self::default()
    }

    /// Table from `(input, output)` rows in ascending input order
    pub fn from_points(points: &[(f32, f32)]) -> Result<Self, CurveError> {
        let mut table = Self::new();
        for &(input, output) in points {
            table.push(input, output)?;
        }
        Ok(table)
    }

    /// Append a row; its input must exceed the last input
    pub fn push(&mut self, input: f32, output: f32) -> Result<(), CurveError> {
        if !input.is_finite() || !output.is_finite() {
            return Err(CurveError::NonFinite);
        }
        if let Some(last) = self.points.last() {
            if input <= last.input {
                return Err(CurveError::NotAscending {
                    index: self.points.len(),
                    input,
                    previous: last.input,
                });
            }
        }
        self.points
            .push(CurvePoint { input, output })
            .map_err(|_| CurveError::Capacity { max: MAX_CURVE_POINTS })
    }

    /// Remove all rows
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Rows in input order
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Row count
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interpolated output for `x`, clamped to the table's range
    pub fn lookup(&self, x: f32) -> Result<f32, CurveError> {
        if x.is_nan() {
            return Err(CurveError::NonFinite);
        }
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 2 => (first, last),
            _ => return Err(CurveError::TooFewPoints { len: self.points.len() }),
        };

        if x <= first.input {
            return Ok(first.output);
        }
        if x >= last.input {
            return Ok(last.output);
        }

        // First row with input > x; x is strictly inside the range so 1 ≤ upper < len
        let upper = self.points.partition_point(|p| p.input <= x);
        let lo = self.points[upper - 1];
        let hi = self.points[upper];

        let fraction = (x - lo.input) / (hi.input - lo.input);
        Ok(lo.output + fraction * (hi.output - lo.output))
    }

    fn to_pairs(&self) -> Vec<(f32, f32)> {
        self.points.iter().map(|p| (p.input, p.output)).collect()
    }
}

/// Calibration through a [`CurveTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct CurveInterpolator {
    table: CurveTable,
}

impl CurveInterpolator {
    /// Interpolator over `table`
    pub fn new(table: CurveTable) -> Self {
        Self { table }
    }

    /// Current table
    pub fn table(&self) -> &CurveTable {
        &self.table
    }

    /// Replace the table
    pub fn set_table(&mut self, table: CurveTable) {
        self.table = table;
    }

    /// Same as [`CurveTable::lookup`]
    pub fn lookup(&self, x: f32) -> Result<f32, CurveError> {
        self.table.lookup(x)
    }
}

impl Transform for CurveInterpolator {
    type Input = f32;
    type Output = f32;

    fn name(&self) -> &'static str {
        "CurveInterpolator"
    }

    fn apply(&mut self, x: f32) -> Option<f32> {
        match self.table.lookup(x) {
            Ok(y) => Some(y),
            Err(CurveError::NonFinite) => None,
            Err(err) => {
                log_error!("curve lookup failed: {}", err);
                None
            }
        }
    }
}

impl Configurable for CurveInterpolator {
    fn param_keys(&self) -> &'static [&'static str] {
        &["samples"]
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        match key {
            "samples" => Some(ParamValue::Curve(self.table.to_pairs())),
            _ => None,
        }
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        match key {
            "samples" => {
                let points = value.as_curve().ok_or(ConfigError::TypeMismatch {
                    key: "samples",
                    expected: "a list of [input, output] pairs",
                })?;
                let table = CurveTable::from_points(points)?;
                if table.len() < 2 {
                    return Err(CurveError::TooFewPoints { len: table.len() }.into());
                }
                self.table = table;
                Ok(())
            }
            _ => Err(ConfigError::UnknownParam(String::from(key))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn sender() -> CurveTable {
        CurveTable::from_points(&[(20.0, 393.15), (30.0, 383.15)]).unwrap()
    }

    #[test]
    fn midpoint_interpolation() {
        let y = sender().lookup(25.0).unwrap();
        assert!((y - 388.15).abs() < 1e-3);
    }

    #[test]
    fn clamps_outside_range() {
        assert_eq!(sender().lookup(10.0), Ok(393.15));
        assert_eq!(sender().lookup(100.0), Ok(383.15));
        assert_eq!(sender().lookup(20.0), Ok(393.15));
        assert_eq!(sender().lookup(30.0), Ok(383.15));
    }

    #[test]
    fn exact_interior_row_is_returned() {
        let table =
            CurveTable::from_points(&[(20.0, 393.15), (30.0, 383.15), (40.0, 373.15)]).unwrap();
        assert_eq!(table.lookup(30.0), Ok(383.15));
        assert!((table.lookup(35.0).unwrap() - 378.15).abs() < 1e-3);
    }

    #[test]
    fn short_tables_fail_explicitly() {
        assert_eq!(CurveTable::new().lookup(1.0), Err(CurveError::TooFewPoints { len: 0 }));
        let one = CurveTable::from_points(&[(1.0, 2.0)]).unwrap();
        assert_eq!(one.lookup(1.0), Err(CurveError::TooFewPoints { len: 1 }));
    }

    #[test]
    fn rejects_unsorted_and_duplicate_inputs() {
        let err = CurveTable::from_points(&[(30.0, 1.0), (20.0, 2.0)]).unwrap_err();
        assert!(matches!(err, CurveError::NotAscending { index: 1, .. }));
        let err = CurveTable::from_points(&[(20.0, 1.0), (20.0, 2.0)]).unwrap_err();
        assert!(matches!(err, CurveError::NotAscending { index: 1, .. }));
    }

    #[test]
    fn rejects_non_finite_rows_and_nan_lookups() {
        assert_eq!(CurveTable::from_points(&[(f32::NAN, 1.0)]), Err(CurveError::NonFinite));
        assert_eq!(sender().lookup(f32::NAN), Err(CurveError::NonFinite));
    }

    #[test]
    fn capacity_is_bounded() {
        let mut table = CurveTable::new();
        for i in 0..MAX_CURVE_POINTS {
            table.push(i as f32, 0.0).unwrap();
        }
        assert_eq!(table.push(1000.0, 0.0), Err(CurveError::Capacity { max: MAX_CURVE_POINTS }));
    }

    #[test]
    fn interpolator_withholds_on_misconfiguration() {
        let mut empty = CurveInterpolator::new(CurveTable::new());
        assert_eq!(empty.apply(25.0), None);
    }

    #[test]
    fn replacing_samples_validates_first() {
        let mut curve = CurveInterpolator::new(sender());
        let bad = ParamValue::Curve(vec![(40.0, 1.0), (30.0, 2.0)]);
        assert!(curve.set_param("samples", &bad).is_err());
        assert_eq!(curve.table(), &sender());

        let good = ParamValue::Curve(vec![(0.0, 0.0), (10.0, 100.0)]);
        curve.set_param("samples", &good).unwrap();
        assert_eq!(curve.lookup(2.5), Ok(25.0));
        assert_eq!(curve.get_param("samples"), Some(good));
    }
}
