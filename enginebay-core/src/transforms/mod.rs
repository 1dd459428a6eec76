//! Value Transforms
//!
//! Transforms sit between producers and sinks and derive one output sample
//! from one input sample.
//!
//! ## Transform Architecture
//!
//! ```text
//! Producer → [Transform] → [Transform] → ... → Sink
//!                 ↓              ↓
//!           last value     last value
//! ```
//!
//! A transform may:
//! - Convert units (1:1, pure): `Linear`, `AnalogVoltage`, `VoltageDividerR2`
//! - Calibrate (1:1, pure): `CurveInterpolator`
//! - Rate-convert a counted window: `Frequency`
//! - Smooth (1:1, stateful): `MovingAverage`
//! - Withhold (1:0) when the input cannot be converted meaningfully
//!
//! Withheld samples stop at that node for this firing; nothing downstream
//! runs and the node's last value is unchanged.

use crate::config::{Configurable, ParamValue};
use crate::errors::ConfigResult;
use crate::node::{Consumer, Emitter, Observable};

pub mod curve;
pub mod frequency;
pub mod lambda;
pub mod linear;
pub mod moving_average;
pub mod voltage;

pub use curve::{CurveInterpolator, CurvePoint, CurveTable};
pub use frequency::Frequency;
pub use lambda::LambdaTransform;
pub use linear::Linear;
pub use moving_average::MovingAverage;
pub use voltage::{AnalogVoltage, VoltageDividerR2};

/// One-in, at-most-one-out converter
///
/// ## Implementation Guidelines
///
/// 1. **Pure when possible**: same input, same output
/// 2. **Bounded work**: runs inside a scheduler tick
/// 3. **Withhold, don't invent**: return `None` instead of a sentinel
///
/// ## Example
///
/// ```rust
/// use enginebay_core::Transform;
///
/// struct KelvinToCelsius;
///
/// impl Transform for KelvinToCelsius {
///     type Input = f32;
///     type Output = f32;
///
///     fn name(&self) -> &'static str {
///         "KelvinToCelsius"
///     }
///
///     fn apply(&mut self, kelvin: f32) -> Option<f32> {
///         Some(kelvin - 273.15)
///     }
/// }
/// ```
pub trait Transform {
    /// Sample type accepted
    type Input;

    /// Sample type emitted
    type Output: Clone + 'static;

    /// Node name for logs and topology listings
    fn name(&self) -> &'static str;

    /// Derive the output for one input; `None` withholds it
    fn apply(&mut self, input: Self::Input) -> Option<Self::Output>;
}

/// Graph node wrapping a transform and its output slot
pub struct TransformNode<X: Transform> {
    transform: X,
    output: Observable<X::Output>,
    withheld: u64,
}

impl<X: Transform> TransformNode<X> {
    /// Wrap `transform` with no subscribers
    pub fn new(transform: X) -> Self {
        Self { transform, output: Observable::new(), withheld: 0 }
    }

    /// The wrapped transform
    pub fn transform(&self) -> &X {
        &self.transform
    }

    /// The wrapped transform, for parameter changes
    pub fn transform_mut(&mut self) -> &mut X {
        &mut self.transform
    }

    /// Inputs that produced no output
    pub fn withheld(&self) -> u64 {
        self.withheld
    }
}

impl<X: Transform> Consumer<X::Input> for TransformNode<X> {
    fn consume(&mut self, value: X::Input) {
        match self.transform.apply(value) {
            Some(out) => self.output.emit(out),
            None => {
                self.withheld += 1;
                log_debug!("{}: sample withheld", self.transform.name());
            }
        }
    }
}

impl<X: Transform> Emitter for TransformNode<X> {
    type Output = X::Output;

    fn observable(&self) -> &Observable<X::Output> {
        &self.output
    }

    fn observable_mut(&mut self) -> &mut Observable<X::Output> {
        &mut self.output
    }
}

impl<X: Transform + Configurable> Configurable for TransformNode<X> {
    fn param_keys(&self) -> &'static [&'static str] {
        self.transform.param_keys()
    }

    fn get_param(&self, key: &str) -> Option<ParamValue> {
        self.transform.get_param(key)
    }

    fn set_param(&mut self, key: &str, value: &ParamValue) -> ConfigResult<()> {
        self.transform.set_param(key, value)
    }
}
