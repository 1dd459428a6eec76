//! Bounded Node State
//!
//! Capacities fixed at compile time so node state never grows after wiring.

/// Maximum number of points in a calibration curve.
///
/// The largest curve in the engine-room wiring has 11 points (fuel rate
/// against RPM); 32 leaves room for finer sender calibrations.
pub const MAX_CURVE_POINTS: usize = 32;

/// Maximum moving-average window length.
///
/// The window size itself is a runtime parameter bounded by this value.
/// 64 samples × 4 bytes keeps each averaging node under 300 bytes.
pub const MAX_AVERAGE_WINDOW: usize = 64;
