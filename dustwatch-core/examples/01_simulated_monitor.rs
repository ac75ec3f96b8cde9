//! Simulated Dust Monitoring Example
//!
//! Runs the full measurement engine against a manually driven clock and
//! interrupt-style level latches, no hardware required.
//!
//! ## What You'll Learn
//!
//! - Wiring a monitor from its three collaborators (clock, probe, store)
//! - How the warm-up period delays the first reading
//! - How duty-cycle ratios turn into concentrations and an index
//! - Reading the diagnostic snapshot
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_monitor
//! ```

use dustwatch_core::{
    constants::{WARMUP_MS, WINDOW_MS},
    ChannelId, DustMonitor, FixedClock, Level, LevelLatches, MemoryStore,
};

/// One low pulse on `channel`, with the two `update()` calls the control
/// loop would make around its edges.
fn pulse(
    monitor: &mut DustMonitor<&FixedClock, &LevelLatches, MemoryStore>,
    clock: &FixedClock,
    latches: &LevelLatches,
    channel: ChannelId,
    start: u32,
    width: u32,
) {
    clock.set(start);
    latches.store(channel, Level::Low);
    monitor.update();

    clock.set(start + width);
    latches.store(channel, Level::High);
    monitor.update();
}

fn main() {
    println!("Dustwatch Simulated Monitor");
    println!("===========================\n");

    // On hardware the latches live in a static shared with the pin-change
    // interrupt; here the simulation writes them directly.
    let clock = FixedClock::new(0);
    let latches = LevelLatches::new();
    let mut monitor = DustMonitor::new(&clock, &latches, MemoryStore::new());

    println!("Warming up ({} s)...", WARMUP_MS / 1000);
    assert!(monitor.is_warming_up());
    clock.set(WARMUP_MS);
    monitor.update();
    println!("Warm-up complete, windows armed.\n");

    // Two measurement windows of simulated traffic. The fine channel sees
    // twice the pulse density of the coarse one, so the delta is positive.
    for window in 0..2u32 {
        let open = WARMUP_MS + window * WINDOW_MS;

        for i in 0..12u32 {
            pulse(
                &mut monitor,
                &clock,
                &latches,
                ChannelId::Pm25,
                open + 1_000 + i * 1_000,
                50,
            );
            if i < 6 {
                pulse(
                    &mut monitor,
                    &clock,
                    &latches,
                    ChannelId::Pm10,
                    open + 1_500 + i * 1_000,
                    50,
                );
            }
        }

        // close the window and read everything derived from it
        clock.set(open + WINDOW_MS);
        let ratio_pm25 = monitor.low_ratio(ChannelId::Pm25).unwrap();
        let ratio_pm10 = monitor.low_ratio(ChannelId::Pm10).unwrap();

        println!("Window {}:", window + 1);
        println!("  PM2.5 duty cycle: {:.3} %", ratio_pm25);
        println!("  PM10  duty cycle: {:.3} %", ratio_pm10);

        if let Some(measurement) = monitor.measurement() {
            println!("  PM2.5: {:7.2} ug/m3", measurement.pm25_ugm3);
            println!("  PM10 : {:7.2} ug/m3", measurement.pm10_ugm3);
            println!("  AQI  : {}", measurement.aqi);
        }
        println!();
    }

    println!("Diagnostic snapshot:");
    print!("{}", monitor.snapshot());
}
