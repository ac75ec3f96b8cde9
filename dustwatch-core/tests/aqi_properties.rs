//! Property tests for the AQI mapping and pulse validation
//!
//! Exercises the invariants that must hold for *any* input, not just the
//! tabulated scenarios: monotonicity within each breakpoint segment, the
//! sentinel regions, and the all-or-nothing pulse contribution rule.

use dustwatch_core::{
    aqi,
    calibration::Coefficient,
    channel::Channel,
    constants::{MAX_PULSE_MS, MIN_PULSE_MS},
    Level,
};
use proptest::prelude::*;

/// Breakpoint segments as (low, high) delta bounds. The low bound of every
/// segment but the first is exclusive; the last segment is the unbounded
/// extension, capped here for generation.
const SEGMENTS: [(f32, f32); 8] = [
    (0.0, 15.4),
    (15.5, 40.5),
    (40.5, 65.5),
    (65.5, 150.5),
    (150.5, 250.5),
    (250.5, 350.5),
    (350.5, 500.0),
    (500.0, 2000.0),
];

fn delta_in_segment(segment: usize, fraction: f32) -> f32 {
    let (low, high) = SEGMENTS[segment];
    low + (high - low) * fraction
}

proptest! {
    #[test]
    fn index_is_monotone_within_each_segment(
        segment in 0usize..SEGMENTS.len(),
        a in 0.001f32..=1.0,
        b in 0.001f32..=1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low_delta = delta_in_segment(segment, lo);
        let high_delta = delta_in_segment(segment, hi);

        prop_assert!(aqi::from_delta(low_delta) <= aqi::from_delta(high_delta));
    }

    #[test]
    fn index_is_defined_everywhere_in_a_segment(
        segment in 0usize..SEGMENTS.len(),
        fraction in 0.001f32..=0.999,
    ) {
        let delta = delta_in_segment(segment, fraction);
        prop_assert!(aqi::from_delta(delta) >= 0);
    }

    #[test]
    fn dead_zone_maps_to_sentinel(delta in 15.41f32..=15.49) {
        prop_assert_eq!(aqi::from_delta(delta), aqi::UNAVAILABLE);
    }

    #[test]
    fn negative_delta_maps_to_sentinel(delta in -1000.0f32..=-0.001) {
        prop_assert_eq!(aqi::from_delta(delta), aqi::UNAVAILABLE);
    }

    #[test]
    fn pulse_contribution_is_all_or_nothing(duration in 0u32..200) {
        let mut channel = Channel::new(0);
        channel.observe(Level::Low, 1_000);
        channel.observe(Level::High, 1_000 + duration);

        let expected = if (MIN_PULSE_MS..=MAX_PULSE_MS).contains(&duration) {
            duration
        } else {
            0
        };
        prop_assert_eq!(channel.low_total(), expected);
    }

    #[test]
    fn accumulator_untouched_by_discarded_pulses(
        plausible in MIN_PULSE_MS..=MAX_PULSE_MS,
        bounce in 0u32..MIN_PULSE_MS,
    ) {
        let mut channel = Channel::new(0);
        channel.observe(Level::Low, 1_000);
        channel.observe(Level::High, 1_000 + plausible);

        channel.observe(Level::Low, 10_000);
        channel.observe(Level::High, 10_000 + bounce);

        prop_assert_eq!(channel.low_total(), plausible);
    }
}

// Coefficient validation is total: every non-zero byte is accepted.
proptest! {
    #[test]
    fn every_nonzero_byte_is_a_valid_coefficient(value in 1u8..=255) {
        let coefficient = Coefficient::new(value).unwrap();
        prop_assert_eq!(coefficient.get(), value);
    }
}
