//! Dust Monitor: the Engine Facade
//!
//! ## Overview
//!
//! [`DustMonitor`] composes the two sensing channels with their collaborators
//! (a wrapping millisecond [`Clock`], a [`LevelProbe`] delivering per-channel
//! level observations, and a [`CoeffStore`] persisting the calibration byte)
//! into the object the control loop drives:
//!
//! ```text
//! edges ──► LevelProbe ──► update() ──► per-channel accumulators
//!                                            │
//!                      low_ratio() ◄─────────┘ (lazy window closure)
//!                           │
//!                  particle_weight()  ──►  aqi() / measurement()
//! ```
//!
//! The monitor is an explicitly constructed instance: create it at startup,
//! keep it wherever the control loop lives, and hand the *latches* (not the
//! monitor) to the interrupt registration. No ambient global state exists.
//!
//! ## Execution Contract
//!
//! `update()` must run once per control-loop iteration and performs every
//! state-machine transition. The accessors are pull-based and safe to call
//! at any rate; reported values only change at window boundaries. Nothing
//! here blocks, sleeps, or panics in the measurement path.
//!
//! ```
//! use dustwatch_core::{DustMonitor, FixedClock, LevelLatches, MemoryStore};
//!
//! static LATCHES: LevelLatches = LevelLatches::new();
//!
//! let clock = FixedClock::new(0);
//! let mut monitor = DustMonitor::new(&clock, &LATCHES, MemoryStore::new());
//!
//! // control loop
//! monitor.update();
//! assert_eq!(monitor.aqi(), -1); // still initializing
//! ```

use core::fmt;

use crate::{
    aqi,
    calibration::{CoeffStore, Coefficient},
    channel::{Channel, ChannelId},
    constants::WARMUP_MS,
    errors::CalibrationResult,
    level::LevelProbe,
    time::{wrapping_since, Clock, Ticks},
};

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

/// Ratio-to-mass regression selecting how a duty-cycle ratio becomes a
/// concentration in µg/m³.
///
/// Two calibration forms exist depending on deployment; both clamp negative
/// regression output to zero, since concentration is physically
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MassCurve {
    /// Cubic fit to the manufacturer's datasheet points.
    #[default]
    DatasheetCubic,
    /// Linear fit from field calibration against a reference instrument.
    FieldLinear,
}

impl MassCurve {
    /// Mass concentration (µg/m³) for a duty-cycle ratio (percent).
    pub fn concentration(self, ratio: f32) -> f32 {
        let weight = match self {
            Self::DatasheetCubic => {
                0.30473 * libm::powf(ratio, 3.0) - 2.63943 * libm::powf(ratio, 2.0)
                    + 102.60291 * ratio
                    - 3.49616
            }
            Self::FieldLinear => -0.158484 + 0.10085 * ratio,
        };
        if weight < 0.0 {
            0.0
        } else {
            weight
        }
    }
}

/// One complete reading for display and logging collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    /// Coarse-channel mass concentration (µg/m³).
    pub pm10_ugm3: f32,
    /// Fine-channel mass concentration (µg/m³).
    pub pm25_ugm3: f32,
    /// Air-quality index derived from the channel delta.
    pub aqi: i32,
}

/// Diagnostic state of one channel, captured by [`DustMonitor::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSnapshot {
    /// Timestamp at which the channel's current window opened.
    pub window_start: Ticks,
    /// Raw low-duration total accumulated so far in the window (ms).
    pub low_total: u32,
    /// Ratio stored at the last window closure, if any.
    pub last_ratio: Option<f32>,
}

/// Non-mutating diagnostic dump of the whole monitor, for the serial and
/// log collaborators.
///
/// Renders as text through `Display`; [`dump_into`](Self::dump_into) writes
/// the same text into a fixed-capacity buffer on alloc-free targets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorSnapshot {
    /// Coarse-channel state.
    pub pm10: ChannelSnapshot,
    /// Fine-channel state.
    pub pm25: ChannelSnapshot,
    /// Active calibration divisor.
    pub coefficient: u8,
    /// Whether the warm-up settling period is still running.
    pub warming_up: bool,
}

impl MonitorSnapshot {
    /// Render the textual dump into a fixed-capacity string.
    pub fn dump_into<const M: usize>(&self, out: &mut heapless::String<M>) -> fmt::Result {
        use fmt::Write;
        write!(out, "{}", self)
    }
}

impl fmt::Display for MonitorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "dust monitor: coeff={} warming_up={}",
            self.coefficient, self.warming_up
        )?;
        for (name, channel) in [("pm10", &self.pm10), ("pm25", &self.pm25)] {
            write!(
                f,
                "  {}: window_start={}ms low_total={}ms ratio=",
                name, channel.window_start, channel.low_total
            )?;
            match channel.last_ratio {
                Some(ratio) => writeln!(f, "{:.2}%", ratio)?,
                None => writeln!(f, "n/a")?,
            }
        }
        Ok(())
    }
}

/// The dust-concentration measurement engine.
///
/// Generic over its three collaborators so targets, hosts, and tests inject
/// their own; see the module docs for the wiring. Construction reads the
/// calibration coefficient from the store once; a missing, zero, or
/// unreadable byte falls back to the default divisor of 1 rather than
/// failing; the engine has no fatal startup path.
pub struct DustMonitor<C: Clock, P: LevelProbe, S: CoeffStore> {
    channels: [Channel; 2],
    clock: C,
    probe: P,
    store: S,
    coefficient: Coefficient,
    curve: MassCurve,
    /// Construction timestamp anchoring the warm-up period.
    boot: Ticks,
    warmed_up: bool,
}

impl<C: Clock, P: LevelProbe, S: CoeffStore> DustMonitor<C, P, S> {
    /// Build a monitor with the datasheet cubic mass curve.
    pub fn new(clock: C, probe: P, store: S) -> Self {
        Self::with_curve(clock, probe, store, MassCurve::default())
    }

    /// Build a monitor with an explicit mass curve.
    pub fn with_curve(clock: C, probe: P, mut store: S, curve: MassCurve) -> Self {
        let coefficient = match store.load() {
            Ok(Some(raw)) => match Coefficient::new(raw) {
                Ok(coefficient) => coefficient,
                Err(_) => Coefficient::DEFAULT, // stored 0 means "unset"
            },
            Ok(None) => Coefficient::DEFAULT,
            Err(_) => {
                log_warn!("calibration store unreadable, using default coefficient");
                Coefficient::DEFAULT
            }
        };

        let now = clock.now_ms();
        Self {
            channels: [Channel::new(now), Channel::new(now)],
            clock,
            probe,
            store,
            coefficient,
            curve,
            boot: now,
            warmed_up: false,
        }
    }

    /// Run one control-loop iteration: both channels' edge state machines
    /// plus the one-shot warm-up re-arm.
    ///
    /// Must be called once per loop iteration; all state transitions happen
    /// here, never in interrupt context.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();

        if !self.warmed_up && wrapping_since(now, self.boot) >= WARMUP_MS {
            // sensing element has settled; discard what it produced so far
            self.warmed_up = true;
            self.rearm_channels(now);
        }

        for id in ChannelId::ALL {
            let level = self.probe.level(id);
            self.channels[id.index()].observe(level, now);
        }
    }

    /// Calibrated duty-cycle ratio of `channel` in percent.
    ///
    /// Lazily closes the channel's window when due; between closures the
    /// stored ratio is returned unchanged. `None` until the first closure.
    pub fn low_ratio(&mut self, channel: ChannelId) -> Option<f32> {
        let now = self.clock.now_ms();
        self.channels[channel.index()].ratio(now, self.coefficient)
    }

    /// Mass concentration of `channel` in µg/m³, clamped non-negative.
    pub fn particle_weight(&mut self, channel: ChannelId) -> Option<f32> {
        let curve = self.curve;
        self.low_ratio(channel).map(|ratio| curve.concentration(ratio))
    }

    /// Air-quality index from the fine/coarse channel delta.
    ///
    /// Returns [`aqi::UNAVAILABLE`] (−1) until both channels have completed
    /// at least one window, and for deltas no breakpoint segment covers.
    pub fn aqi(&mut self) -> i32 {
        match (
            self.particle_weight(ChannelId::Pm25),
            self.particle_weight(ChannelId::Pm10),
        ) {
            (Some(fine), Some(coarse)) => aqi::from_delta(fine - coarse),
            _ => aqi::UNAVAILABLE,
        }
    }

    /// One complete reading for display/logging, or `None` while either
    /// channel is still initializing.
    pub fn measurement(&mut self) -> Option<Measurement> {
        let pm10_ugm3 = self.particle_weight(ChannelId::Pm10)?;
        let pm25_ugm3 = self.particle_weight(ChannelId::Pm25)?;
        Some(Measurement {
            pm10_ugm3,
            pm25_ugm3,
            aqi: aqi::from_delta(pm25_ugm3 - pm10_ugm3),
        })
    }

    /// Re-arm both channels' windows to open now.
    pub fn reset(&mut self) {
        let now = self.clock.now_ms();
        self.rearm_channels(now);
    }

    /// Whether the post-power-on settling period is still running.
    pub fn is_warming_up(&self) -> bool {
        !self.warmed_up
    }

    /// Active calibration divisor.
    pub fn coefficient(&self) -> u8 {
        self.coefficient.get()
    }

    /// Validate, persist, and apply a new calibration divisor, returning
    /// the applied value.
    ///
    /// Persistence happens before the divisor takes effect: if the store
    /// write fails the previous coefficient stays active, so reported
    /// ratios and the persisted byte never disagree across a power cycle.
    pub fn set_coefficient(&mut self, value: u8) -> CalibrationResult<u8> {
        let coefficient = Coefficient::new(value)?;
        self.store.save(value)?;
        self.coefficient = coefficient;
        Ok(value)
    }

    /// Capture diagnostic state without disturbing any window.
    pub fn snapshot(&self) -> MonitorSnapshot {
        let snap = |channel: &Channel| ChannelSnapshot {
            window_start: channel.window_start(),
            low_total: channel.low_total(),
            last_ratio: channel.last_ratio(),
        };
        MonitorSnapshot {
            pm10: snap(&self.channels[ChannelId::Pm10.index()]),
            pm25: snap(&self.channels[ChannelId::Pm25.index()]),
            coefficient: self.coefficient.get(),
            warming_up: self.is_warming_up(),
        }
    }

    fn rearm_channels(&mut self, now: Ticks) {
        for channel in &mut self.channels {
            channel.rearm(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calibration::MemoryStore,
        constants::WINDOW_MS,
        errors::CalibrationError,
        level::{Level, LevelLatches},
        time::FixedClock,
    };

    fn idle_probe(_: ChannelId) -> Level {
        Level::High
    }

    #[test]
    fn construction_loads_stored_coefficient() {
        let clock = FixedClock::new(0);
        let monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::with_value(4));
        assert_eq!(monitor.coefficient(), 4);
    }

    #[test]
    fn stored_zero_falls_back_to_default() {
        let clock = FixedClock::new(0);
        let monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::with_value(0));
        assert_eq!(monitor.coefficient(), 1);
    }

    #[test]
    fn set_coefficient_persists_immediately() {
        let clock = FixedClock::new(0);
        let mut monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::new());

        assert_eq!(monitor.set_coefficient(3), Ok(3));
        assert_eq!(monitor.coefficient(), 3);

        let mut store = monitor.store.clone();
        assert_eq!(store.load(), Ok(Some(3)));
    }

    #[test]
    fn set_coefficient_rejects_zero() {
        let clock = FixedClock::new(0);
        let mut monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::new());

        assert_eq!(
            monitor.set_coefficient(0),
            Err(CalibrationError::InvalidCoefficient { value: 0 })
        );
        assert_eq!(monitor.coefficient(), 1);
    }

    #[test]
    fn warm_up_rearms_windows_once() {
        let clock = FixedClock::new(0);
        let mut monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::new());
        assert!(monitor.is_warming_up());

        clock.set(WARMUP_MS);
        monitor.update();
        assert!(!monitor.is_warming_up());

        // windows were re-armed at warm-up end, so the span restarts:
        // one full window after WARMUP_MS must elapse before any ratio
        clock.set(WARMUP_MS + WINDOW_MS - 1);
        assert_eq!(monitor.low_ratio(ChannelId::Pm10), None);

        clock.set(WARMUP_MS + WINDOW_MS);
        assert!(monitor.low_ratio(ChannelId::Pm10).is_some());
    }

    #[test]
    fn aqi_unavailable_until_both_channels_ready() {
        let clock = FixedClock::new(0);
        let latches = LevelLatches::new();
        let mut monitor = DustMonitor::new(&clock, &latches, MemoryStore::new());

        monitor.update();
        assert_eq!(monitor.aqi(), aqi::UNAVAILABLE);
        assert_eq!(monitor.measurement(), None);
    }

    #[test]
    fn snapshot_reflects_state_without_mutating() {
        let clock = FixedClock::new(1000);
        let mut monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::with_value(2));
        monitor.update();

        let snapshot = monitor.snapshot();
        assert_eq!(snapshot.coefficient, 2);
        assert!(snapshot.warming_up);
        assert_eq!(snapshot.pm10.window_start, 1000);
        assert_eq!(snapshot.pm10.low_total, 0);
        assert_eq!(snapshot.pm10.last_ratio, None);

        let rendered = snapshot.to_string();
        assert!(rendered.contains("coeff=2"));
        assert!(rendered.contains("ratio=n/a"));
    }

    #[test]
    fn reset_rearms_both_windows() {
        let clock = FixedClock::new(0);
        let mut monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::new());

        clock.set(WARMUP_MS);
        monitor.update();

        // halfway through the first window, a collaborator resets
        clock.set(WARMUP_MS + WINDOW_MS / 2);
        monitor.reset();

        // the pre-reset closure time passes without a ratio
        clock.set(WARMUP_MS + WINDOW_MS);
        assert_eq!(monitor.low_ratio(ChannelId::Pm10), None);
        assert_eq!(monitor.low_ratio(ChannelId::Pm25), None);

        clock.set(WARMUP_MS + WINDOW_MS / 2 + WINDOW_MS);
        assert!(monitor.low_ratio(ChannelId::Pm10).is_some());
        assert!(monitor.low_ratio(ChannelId::Pm25).is_some());
    }

    #[test]
    fn snapshot_dumps_into_fixed_buffer() {
        let clock = FixedClock::new(0);
        let monitor = DustMonitor::new(&clock, idle_probe, MemoryStore::new());

        let mut buffer: heapless::String<256> = heapless::String::new();
        monitor.snapshot().dump_into(&mut buffer).unwrap();
        assert!(buffer.contains("dust monitor"));
        assert!(buffer.contains("pm25"));
    }

    #[test]
    fn cubic_curve_clamps_negative_output() {
        // zero ratio gives the negative intercept, clamped to zero
        assert_eq!(MassCurve::DatasheetCubic.concentration(0.0), 0.0);
    }

    #[test]
    fn linear_curve_matches_field_fit() {
        let weight = MassCurve::FieldLinear.concentration(60.0);
        assert!((weight - 5.8925).abs() < 1e-3);
    }
}
