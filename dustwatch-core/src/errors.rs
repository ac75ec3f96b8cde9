//! Error Types for the Calibration Path
//!
//! The measurement path itself has no error values: implausible pulses are
//! silently discarded, an uninitialized index is a sentinel, wraparound
//! forces window closure, negative regression output clamps to zero. The
//! one genuinely fallible operation is calibration persistence, and its
//! errors are kept small (`Copy`, inline data only) so they cost nothing to
//! return from the control path.

use thiserror_no_std::Error;

/// Result type for calibration operations.
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Errors raised while reading, validating, or persisting the calibration
/// coefficient.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    /// The requested coefficient is not a valid divisor.
    #[error("coefficient {value} is not a valid divisor")]
    InvalidCoefficient {
        /// The rejected value (only 0 is rejected; the divisor must be a
        /// small positive integer).
        value: u8,
    },

    /// The persistent store failed to read or write the coefficient byte.
    #[error("calibration store unavailable")]
    StoreUnavailable,
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidCoefficient { value } => {
                defmt::write!(fmt, "coefficient {} is not a valid divisor", value)
            }
            Self::StoreUnavailable => defmt::write!(fmt, "calibration store unavailable"),
        }
    }
}
