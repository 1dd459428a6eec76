//! Constants for EngineBay Core
//!
//! Numeric limits and defaults used across the pipeline, kept in one place
//! with their units and sources.
//!
//! ## Organization
//!
//! - **Sensors**: ADC ranges and electrical limits for the analog front end
//! - **Buffers**: compile-time capacities for bounded node state
//! - **Time**: default sampling periods

/// ADC ranges and electrical limits.
pub mod sensors;

/// Compile-time capacities for bounded node state.
pub mod buffers;

/// Default sampling periods and time conversions.
pub mod time;

pub use buffers::{MAX_AVERAGE_WINDOW, MAX_CURVE_POINTS};
pub use sensors::{ADC_MAX_12BIT, DIVIDER_MIN_HEADROOM_V, DIVIDER_R2_MAX_OHMS};
pub use time::{DEFAULT_SAMPLE_INTERVAL_MS, MS_PER_SECOND};
