//! Wrapping millisecond time for the measurement engine
//!
//! The engine's arithmetic is defined on a monotonic 32-bit millisecond
//! counter that wraps roughly every 49.7 days. All span computations use
//! wrap-tolerant subtraction; the window logic additionally treats
//! `now < window_start` as "the counter wrapped" and forces a window
//! closure rather than producing an absurd span.
//!
//! The clock is an injected collaborator: hardware targets adapt their tick
//! counter, hosts and tests use [`SystemClock`] / [`FixedClock`].

use core::cell::Cell;

/// Monotonic wrapping timestamp in milliseconds.
pub type Ticks = u32;

/// Source of monotonic millisecond time.
///
/// Implementations must be monotonic up to wraparound: the counter only
/// moves forward, then wraps to zero at the `u32` boundary. Wall-clock
/// sources are unsuitable (they can step backwards).
pub trait Clock {
    /// Current counter value in milliseconds.
    fn now_ms(&self) -> Ticks;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> Ticks {
        (**self).now_ms()
    }
}

/// Wrap-tolerant span between a start timestamp and now.
///
/// Correct for any pair of timestamps less than one full wrap apart, which
/// the window logic guarantees by closing windows at most [`crate::constants::WINDOW_MS`]
/// after they open.
pub fn wrapping_since(now: Ticks, start: Ticks) -> Ticks {
    now.wrapping_sub(start)
}

/// Manually driven clock for tests and simulations.
///
/// Uses interior mutability so a test can hold a shared reference while the
/// engine holds another (`&FixedClock` implements [`Clock`]).
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<Ticks>,
}

impl FixedClock {
    /// Create a clock reading `start` milliseconds.
    pub const fn new(start: Ticks) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Set the counter to an absolute value.
    pub fn set(&self, ms: Ticks) {
        self.now.set(ms);
    }

    /// Advance the counter, wrapping at the `u32` boundary.
    pub fn advance(&self, ms: Ticks) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> Ticks {
        self.now.get()
    }
}

/// Host clock anchored at construction (requires `std`).
///
/// Reports milliseconds since the clock was created, truncated to `u32`, so
/// it wraps exactly like a hardware tick counter.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemClock {
    /// Anchor a new clock at the current instant.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_ms(&self) -> Ticks {
        self.start.elapsed().as_millis() as Ticks
    }
}
