//! Calibration Coefficient and Its Persistence Seam
//!
//! ## Overview
//!
//! The engine's single persisted datum is one byte: a small positive divisor
//! applied to the duty-cycle ratio before it is reported, letting a deployed
//! unit be trimmed against a reference instrument without reflashing.
//!
//! Lifecycle: read once at engine construction, changed only through an
//! explicit calibration command, written back to the store immediately on
//! change. The store itself (EEPROM, flash page, battery-backed RAM) is an
//! injected collaborator behind [`CoeffStore`], so the engine never touches
//! a hardware register directly.

use core::num::NonZeroU8;

use crate::errors::{CalibrationError, CalibrationResult};

/// Validated calibration divisor.
///
/// Wraps a non-zero byte so the divide in the ratio path can never be a
/// divide-by-zero. Zero is rejected at the boundary, not checked in the
/// hot path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coefficient(NonZeroU8);

impl Coefficient {
    /// The power-on default: divide by 1 (report the raw ratio).
    pub const DEFAULT: Self = Self(NonZeroU8::MIN);

    /// Validate a raw byte as a coefficient.
    pub fn new(value: u8) -> CalibrationResult<Self> {
        NonZeroU8::new(value)
            .map(Self)
            .ok_or(CalibrationError::InvalidCoefficient { value })
    }

    /// The divisor value.
    pub fn get(self) -> u8 {
        self.0.get()
    }
}

impl Default for Coefficient {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Single-byte persistent store for the calibration coefficient.
///
/// Implementations map onto whatever non-volatile byte the target offers.
/// `load` returns `Ok(None)` when the store has never been written (erased
/// flash, fresh EEPROM); a stored `0` is treated the same way by the engine,
/// since 0 is not a valid divisor.
pub trait CoeffStore {
    /// Read the stored coefficient byte, if one has been written.
    fn load(&mut self) -> CalibrationResult<Option<u8>>;

    /// Persist the coefficient byte.
    fn save(&mut self, value: u8) -> CalibrationResult<()>;
}

impl<T: CoeffStore + ?Sized> CoeffStore for &mut T {
    fn load(&mut self) -> CalibrationResult<Option<u8>> {
        (**self).load()
    }

    fn save(&mut self, value: u8) -> CalibrationResult<()> {
        (**self).save(value)
    }
}

/// Volatile in-memory store for hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u8>,
}

impl MemoryStore {
    /// Empty store (never written).
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a value, as if written on a previous power
    /// cycle.
    pub fn with_value(value: u8) -> Self {
        Self { value: Some(value) }
    }
}

impl CoeffStore for MemoryStore {
    fn load(&mut self) -> CalibrationResult<Option<u8>> {
        Ok(self.value)
    }

    fn save(&mut self, value: u8) -> CalibrationResult<()> {
        self.value = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_coefficient() {
        assert_eq!(
            Coefficient::new(0),
            Err(CalibrationError::InvalidCoefficient { value: 0 })
        );
    }

    #[test]
    fn default_divides_by_one() {
        assert_eq!(Coefficient::DEFAULT.get(), 1);
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(), Ok(None));

        store.save(3).unwrap();
        assert_eq!(store.load(), Ok(Some(3)));
    }
}
