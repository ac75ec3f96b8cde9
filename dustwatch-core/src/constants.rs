//! Constants for the Dust Measurement Engine
//!
//! Centralized, documented constants used throughout the engine. All numeric
//! values are defined here with their source (sensor datasheet, deployment
//! experience) so that no magic numbers appear in the measurement path.
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. When adding new constants, document purpose, units, and source
//! 3. Names include units where a unit applies

// ===== PULSE PLAUSIBILITY BOUNDS =====

/// Shortest plausible low pulse (ms).
///
/// The sensing element holds its output low for at least this long per
/// detected particle. Anything shorter is electrical bounce and is
/// discarded without touching the accumulator.
///
/// Source: dust sensor datasheet, minimum output pulse width
pub const MIN_PULSE_MS: u32 = 10;

/// Longest plausible low pulse (ms).
///
/// The output stage cannot hold the line low longer than this for a single
/// detection event. Longer spans indicate a wedged line or noise burst and
/// are discarded.
///
/// Source: dust sensor datasheet, maximum output pulse width
pub const MAX_PULSE_MS: u32 = 90;

// ===== MEASUREMENT WINDOW =====

/// Length of one duty-cycle accumulation window (ms).
///
/// The manufacturer defines concentration over a fixed sampling interval,
/// not instantaneously; low-pulse durations are summed over this span before
/// a ratio is computed. 60 s is the datasheet's recommended interval.
pub const WINDOW_MS: u32 = 60_000;

/// Number of past windows averaged by the sliding filter.
///
/// The reported ratio is a trailing moving average over up to this many
/// window totals. Ten one-minute windows give a ten-minute smoothing
/// horizon, enough to suppress single-window noise without hiding trends.
pub const FILTER_WINDOWS: usize = 10;

// ===== WARM-UP =====

/// Settling time of the sensing element after power-on (ms).
///
/// The heater and optics need this long to stabilize; duty-cycle data
/// gathered earlier is not representative and is discarded by re-arming the
/// measurement windows once this period elapses.
pub const WARMUP_MS: u32 = 60_000;

// ===== CALIBRATION =====

/// Default calibration divisor applied when the persistent store holds no
/// usable value. A divisor of 1 reports the raw duty-cycle ratio.
pub const DEFAULT_COEFFICIENT: u8 = 1;
