//! Dust-concentration measurement engine for dustwatch
//!
//! Derives particulate mass concentration and an air-quality index from the
//! low-frequency duty-cycle output of a two-channel optical dust sensor:
//! interrupt-or-poll edge timing with debounce filtering, windowed
//! duty-cycle accumulation, sliding-average smoothing, a calibrated
//! ratio-to-mass regression, and a piecewise-linear AQI mapping.
//!
//! Key constraints:
//! - No heap allocation anywhere in the measurement path
//! - No blocking, no panics: anomalies degrade to stale or sentinel values
//! - Wrapping 32-bit millisecond timestamps throughout
//! - Interrupt context touches exactly one atomic word per channel
//!
//! ```
//! use dustwatch_core::{ChannelId, DustMonitor, FixedClock, MemoryStore, LevelLatches};
//!
//! static LATCHES: LevelLatches = LevelLatches::new();
//!
//! let clock = FixedClock::new(0);
//! let mut monitor = DustMonitor::new(&clock, &LATCHES, MemoryStore::new());
//!
//! // each control-loop iteration:
//! monitor.update();
//!
//! // pull-based accessors, valid once the first window has closed:
//! let _ratio = monitor.low_ratio(ChannelId::Pm25);
//! let _index = monitor.aqi();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aqi;
pub mod calibration;
pub mod channel;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod level;
pub mod monitor;
pub mod time;

// Public API
pub use calibration::{CoeffStore, Coefficient, MemoryStore};
pub use channel::ChannelId;
pub use errors::{CalibrationError, CalibrationResult};
pub use level::{Level, LevelLatches, LevelProbe};
pub use monitor::{DustMonitor, MassCurve, Measurement, MonitorSnapshot};
pub use time::{Clock, FixedClock, Ticks};

#[cfg(feature = "std")]
pub use time::SystemClock;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
