//! Error Types for the Telemetry Pipeline
//!
//! ## Design Philosophy
//!
//! Errors here fall into two groups with different lifetimes:
//!
//! 1. **Wiring-time errors** (`WiringError`, `SchedulerError`, `ConfigError`)
//!    are returned while the graph is assembled or a parameter is overridden.
//!    They reject the change and leave the previous state untouched.
//!
//! 2. **Runtime errors** (`ReadError`, `CurveError`) happen inside a firing.
//!    A node that hits one withholds its sample for that cycle and logs; the
//!    rest of the pipeline keeps running. Nothing in the hot path panics.
//!
//! The runtime errors are `Copy` and carry only `&'static str` context so
//! they can be returned from driver closures without allocation.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use enginebay_core::{CurveError, CurveTable};
//!
//! let table = CurveTable::from_points(&[(20.0, 393.15)]).unwrap();
//! match table.lookup(25.0) {
//!     Ok(_kelvin) => {}
//!     Err(CurveError::TooFewPoints { len }) => {
//!         // Misconfigured sender curve: withhold this sample
//!         assert_eq!(len, 1);
//!     }
//!     Err(_) => {}
//! }
//! ```

use alloc::string::String;

use thiserror_no_std::Error;

use crate::node::NodeId;

/// Result type for hardware reads behind a producer
pub type ReadResult<T> = Result<T, ReadError>;

/// Result type for parameter access
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure reported by a sampling function
///
/// The producer that receives one withholds its sample for the cycle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    /// Device did not answer (missing 1-Wire ROM, NACK on I2C)
    #[error("sensor not responding")]
    NotResponding,

    /// Bus-level failure with driver context
    #[error("bus error: {0}")]
    Bus(&'static str),

    /// Driver returned a value outside the device's measurement range
    #[error("reading outside sensor range")]
    OutOfRange,
}

/// Calibration curve errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CurveError {
    /// Interpolation needs a bracketing pair
    #[error("curve has {len} point(s), interpolation needs at least 2")]
    TooFewPoints {
        /// Points currently in the table
        len: usize,
    },

    /// Inputs must be strictly increasing
    #[error("curve input {input} at index {index} does not exceed previous input {previous}")]
    NotAscending {
        /// Position of the offending point
        index: usize,
        /// Offending input value
        input: f32,
        /// Input of the point before it
        previous: f32,
    },

    /// NaN or infinite point or lookup input
    #[error("curve input or output is not a finite number")]
    NonFinite,

    /// Table is full
    #[error("curve capacity of {max} points exceeded")]
    Capacity {
        /// Fixed table capacity
        max: usize,
    },
}

/// Scheduler registration errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// A task with a zero period would fire on every tick
    #[error("task '{name}' registered with a zero period")]
    ZeroPeriod {
        /// Task name
        name: &'static str,
    },
}

/// Graph wiring errors
///
/// Every variant rejects the edge; the graph is unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringError {
    /// Node subscribed to itself
    #[error("node {0} cannot subscribe to itself")]
    SelfLoop(NodeId),

    /// Edge would let a node observe its own output
    #[error("edge {from} -> {to} would create a cycle")]
    CycleDetected {
        /// Upstream node
        from: NodeId,
        /// Downstream node
        to: NodeId,
    },

    /// Edge already exists
    #[error("edge {from} -> {to} already wired")]
    DuplicateEdge {
        /// Upstream node
        from: NodeId,
        /// Downstream node
        to: NodeId,
    },

    /// Consumer already has an upstream
    #[error("node {node} already has an upstream ({existing})")]
    FanIn {
        /// Consumer being wired
        node: NodeId,
        /// Its existing upstream
        existing: NodeId,
    },

    /// Handle does not belong to this graph
    #[error("node {0} is not part of this graph")]
    UnknownNode(NodeId),
}

/// Parameter access errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No node is exposed under the path
    #[error("no configurable node at '{0}'")]
    UnknownPath(String),

    /// Path already taken by another node
    #[error("config path '{0}' registered twice")]
    DuplicatePath(String),

    /// Node has no parameter with that key
    #[error("unknown parameter '{0}'")]
    UnknownParam(String),

    /// Value has the wrong shape for the parameter
    #[error("parameter '{key}' expects {expected}")]
    TypeMismatch {
        /// Parameter key
        key: &'static str,
        /// Expected shape
        expected: &'static str,
    },

    /// Value has the right shape but is out of bounds
    #[error("parameter '{key}': {reason}")]
    InvalidValue {
        /// Parameter key
        key: &'static str,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// Parameter is reported but fixed after construction
    #[error("parameter '{0}' is read-only")]
    ReadOnly(&'static str),

    /// Replacement curve failed validation
    #[error("curve rejected: {0}")]
    Curve(CurveError),
}

impl From<CurveError> for ConfigError {
    fn from(err: CurveError) -> Self {
        ConfigError::Curve(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NotResponding => defmt::write!(fmt, "sensor not responding"),
            Self::Bus(reason) => defmt::write!(fmt, "bus error: {}", reason),
            Self::OutOfRange => defmt::write!(fmt, "reading outside sensor range"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CurveError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::TooFewPoints { len } => defmt::write!(fmt, "curve has {} point(s)", len),
            Self::NotAscending { index, input, previous } => {
                defmt::write!(fmt, "curve point {} input {} <= {}", index, input, previous)
            }
            Self::NonFinite => defmt::write!(fmt, "curve value not finite"),
            Self::Capacity { max } => defmt::write!(fmt, "curve capacity {} exceeded", max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn curve_error_converts_into_config_error() {
        let err: ConfigError = CurveError::TooFewPoints { len: 0 }.into();
        assert!(matches!(err, ConfigError::Curve(CurveError::TooFewPoints { len: 0 })));
    }

    #[test]
    fn wiring_error_names_both_nodes() {
        let msg = WiringError::CycleDetected { from: NodeId(3), to: NodeId(1) }.to_string();
        assert!(msg.contains("#3"));
        assert!(msg.contains("#1"));
    }
}
