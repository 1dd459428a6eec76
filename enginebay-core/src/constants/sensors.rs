//! Analog Front-End Specifications
//!
//! Limits for the ADC and the resistive sender circuits it measures.

// ===== ADC =====

/// Full-scale count of a 12-bit SAR ADC.
///
/// The ESP32 ADC1 channels return 0..=4095 at the default 12-bit width.
///
/// Source: ESP32 Technical Reference Manual, SAR ADC chapter
pub const ADC_MAX_12BIT: u16 = 4095;

// ===== VOLTAGE DIVIDER =====

/// Resistance reported when the divider leg reads open circuit (Ω).
///
/// A disconnected sender pulls the measured node up to the supply rail, which
/// would put the divider equation at a zero denominator. Resistive engine
/// senders sit well below 10 kΩ, so 1 MΩ is unambiguous as "open".
pub const DIVIDER_R2_MAX_OHMS: f32 = 1.0e6;

/// Smallest supply-to-node headroom solved as a real resistance (V).
///
/// Below this the ADC quantisation step dominates `Vin - Vout` and the
/// result is noise; the divider reports [`DIVIDER_R2_MAX_OHMS`] instead.
/// One 12-bit step at 3.5 V full scale is ~0.85 mV.
pub const DIVIDER_MIN_HEADROOM_V: f32 = 1.0e-3;
