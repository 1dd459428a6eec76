//! Time Constants

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Default producer period (ms).
///
/// Matches the slow environmental sensors in the engine bay; fast channels
/// (pulse counters, analog senders) are wired with shorter periods.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 10_000;
