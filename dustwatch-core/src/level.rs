//! Level Observations and the Interrupt-Side Latch
//!
//! ## Overview
//!
//! The engine consumes a stream of electrical level observations per sensing
//! channel. Where those observations come from is a hardware concern hidden
//! behind the [`LevelProbe`] seam:
//!
//! - **Poll-only hardware** reads the pin directly each loop iteration. Any
//!   closure `Fn(ChannelId) -> Level` (or a custom impl wrapping the pin
//!   peripheral) serves as the probe.
//! - **Interrupt-capable hardware** snapshots levels from the pin-change
//!   interrupt into [`LevelLatches`] and hands the engine a `&'static`
//!   reference to it. The interrupt handler's only job is the latch store:
//!   O(1), non-blocking, and it never calls into the state machine.
//!
//! ## Concurrency Model
//!
//! The latch is the *single* datum crossing the interrupt/loop boundary.
//! Each channel's level is one `AtomicBool`; the interrupt context is the
//! only writer, the control loop the only reader. `Relaxed` ordering is
//! sufficient because no other memory is published through the latch; the
//! value itself is the entire message. A level overwritten between the
//! interrupt storing it and the loop consuming it loses at most one
//! transition per polling tick, which the debounce filter's minimum pulse
//! width makes harmless.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::channel::ChannelId;

/// Electrical level of a sensing line.
///
/// The sensor asserts its output **low** while a particle is being detected;
/// the line idles high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Line asserted low (detection in progress).
    Low,
    /// Line idle high.
    High,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Level {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(fmt, "low"),
            Self::High => defmt::write!(fmt, "high"),
        }
    }
}

/// Per-channel level observation seam.
///
/// Implementations must be infallible and cheap: the probe is consulted for
/// every channel on every control-loop iteration.
pub trait LevelProbe {
    /// Most recently observable level of `channel`'s line.
    fn level(&self, channel: ChannelId) -> Level;
}

/// Closures work as probes on poll-only hardware and in tests.
impl<F> LevelProbe for F
where
    F: Fn(ChannelId) -> Level,
{
    fn level(&self, channel: ChannelId) -> Level {
        self(channel)
    }
}

/// Interrupt-written level snapshot, one single-word atomic per channel.
///
/// `const`-constructible so it can live in a `static` shared between the
/// edge-interrupt handler (writer) and the control loop (reader):
///
/// ```
/// use dustwatch_core::{ChannelId, Level, LevelLatches};
///
/// static LATCHES: LevelLatches = LevelLatches::new();
///
/// // interrupt context: snapshot the pin level, nothing else
/// LATCHES.store(ChannelId::Pm25, Level::Low);
///
/// // control loop: consumed through the LevelProbe impl
/// assert_eq!(LATCHES.load(ChannelId::Pm25), Level::Low);
/// ```
pub struct LevelLatches {
    /// `true` while the line reads low, indexed by channel.
    low: [AtomicBool; 2],
}

impl LevelLatches {
    /// New latch pair with both lines idle high.
    pub const fn new() -> Self {
        Self {
            low: [AtomicBool::new(false), AtomicBool::new(false)],
        }
    }

    /// Record the level of `channel`'s line. Interrupt-safe.
    pub fn store(&self, channel: ChannelId, level: Level) {
        self.low[channel.index()].store(matches!(level, Level::Low), Ordering::Relaxed);
    }

    /// Last recorded level of `channel`'s line.
    pub fn load(&self, channel: ChannelId) -> Level {
        if self.low[channel.index()].load(Ordering::Relaxed) {
            Level::Low
        } else {
            Level::High
        }
    }
}

impl Default for LevelLatches {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelProbe for LevelLatches {
    fn level(&self, channel: ChannelId) -> Level {
        self.load(channel)
    }
}

impl LevelProbe for &LevelLatches {
    fn level(&self, channel: ChannelId) -> Level {
        self.load(channel)
    }
}
