//! Piecewise-Linear AQI Breakpoint Mapping
//!
//! ## Overview
//!
//! Maps a fine-particle concentration delta (µg/m³) onto a simplified
//! US-EPA-style Air Quality Index. Each segment is linear between two
//! concentration breakpoints and truncates to an integer; values are
//! contiguous at the breakpoints by construction.
//!
//! | delta (µg/m³)   | index                          |
//! |-----------------|--------------------------------|
//! | 0 – 15.4        | `50/15.5 · delta`              |
//! | 15.5 – 40.5     | `50 + 50/25 · (delta − 15.5)`  |
//! | 40.5 – 65.5     | `100 + 50/25 · (delta − 40.5)` |
//! | 65.5 – 150.5    | `150 + 50/85 · (delta − 65.5)` |
//! | 150.5 – 250.5   | `200 + (delta − 150.5)`        |
//! | 250.5 – 350.5   | `300 + (delta − 250.5)`        |
//! | 350.5 – 500.0   | `400 + 100/150 · (delta − 350.5)` |
//! | > 500.0         | `500 + (delta − 500.0)`        |
//!
//! ## Boundary Behavior
//!
//! The comparisons are kept exactly as the deployed scale defines them,
//! including two quirks that are part of the observable contract:
//!
//! - deltas strictly above 15.4 and up to *and including* 15.5 fall between
//!   the first two segments and map to [`UNAVAILABLE`], an inherited dead
//!   zone that is deliberately not "fixed" here;
//! - negative deltas (coarse channel outweighing the fine one) and NaN
//!   (no completed measurement window yet) also map to [`UNAVAILABLE`].

/// Sentinel index meaning "no index available yet", returned while the
/// measurement is initializing and for inputs outside every segment.
pub const UNAVAILABLE: i32 = -1;

/// Map a fine-particle concentration delta onto the index scale.
///
/// Truncation (not rounding) per segment matches the deployed scale. The
/// top segment is an unbounded linear extension, so indices above 500 are
/// possible for extreme concentrations.
pub fn from_delta(delta: f32) -> i32 {
    if delta >= 0.0 && delta <= 15.4 {
        (50.0 / 15.5 * delta) as i32
    } else if delta > 15.5 && delta <= 40.5 {
        50 + (50.0 / 25.0 * (delta - 15.5)) as i32
    } else if delta > 40.5 && delta <= 65.5 {
        100 + (50.0 / 25.0 * (delta - 40.5)) as i32
    } else if delta > 65.5 && delta <= 150.5 {
        150 + (50.0 / 85.0 * (delta - 65.5)) as i32
    } else if delta > 150.5 && delta <= 250.5 {
        200 + (delta - 150.5) as i32
    } else if delta > 250.5 && delta <= 350.5 {
        300 + (delta - 250.5) as i32
    } else if delta > 350.5 && delta <= 500.0 {
        400 + (100.0 / 150.0 * (delta - 350.5)) as i32
    } else if delta > 500.0 {
        500 + (delta - 500.0) as i32
    } else {
        // negative, NaN, or the inherited (15.4, 15.5] dead zone
        UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_is_zero_index() {
        assert_eq!(from_delta(0.0), 0);
    }

    #[test]
    fn first_segment_truncates() {
        // 50/15.5 * 15 = 48.38..
        assert_eq!(from_delta(15.0), 48);
        assert_eq!(from_delta(15.4), 49);
    }

    #[test]
    fn segments_are_contiguous_at_breakpoints() {
        assert_eq!(from_delta(40.5), 100);
        assert_eq!(from_delta(65.5), 150);
        assert_eq!(from_delta(250.5), 300);
        assert_eq!(from_delta(350.5), 400);
    }

    #[test]
    fn mid_segment_values() {
        // 150 + 50/85 * 34.5 = 170.29..
        assert_eq!(from_delta(100.0), 170);
        // 200 + 50.0
        assert_eq!(from_delta(200.5), 250);
        // 400 + 2/3 * 75.0
        assert_eq!(from_delta(425.5), 450);
    }

    #[test]
    fn extension_segment_is_unbounded() {
        assert_eq!(from_delta(600.0), 600);
        assert_eq!(from_delta(1000.5), 1000);
    }

    #[test]
    fn dead_zone_between_first_segments() {
        assert_eq!(from_delta(15.45), UNAVAILABLE);
        assert_eq!(from_delta(15.5), UNAVAILABLE);
    }

    #[test]
    fn negative_delta_unavailable() {
        assert_eq!(from_delta(-0.1), UNAVAILABLE);
        assert_eq!(from_delta(-42.0), UNAVAILABLE);
    }

    #[test]
    fn nan_unavailable() {
        assert_eq!(from_delta(f32::NAN), UNAVAILABLE);
    }

    #[test]
    fn top_of_seventh_segment() {
        // 400 + 100/150 * 149.5 = 499.66..
        assert_eq!(from_delta(500.0), 499);
    }
}
