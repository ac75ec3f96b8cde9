//! Calibration Coefficient Example
//!
//! Shows the lifecycle of the calibration divisor: loaded once at startup
//! from an injected persistent store, changed through the engine's
//! calibration command, written back immediately, surviving a "power
//! cycle".
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_calibration
//! ```

use dustwatch_core::{ChannelId, DustMonitor, FixedClock, Level, LevelLatches, MemoryStore};

fn main() {
    println!("Dustwatch Calibration Example");
    println!("=============================\n");

    let clock = FixedClock::new(0);
    let latches = LevelLatches::new();

    // a store that has never been written, like fresh EEPROM
    let mut store = MemoryStore::new();

    {
        let mut monitor = DustMonitor::new(&clock, &latches, &mut store);
        println!("First boot, empty store:");
        println!("  coefficient = {} (default)\n", monitor.coefficient());

        println!("Calibrating against a reference instrument:");
        match monitor.set_coefficient(2) {
            Ok(applied) => println!("  applied divisor {applied}, persisted immediately"),
            Err(e) => println!("  rejected: {e}"),
        }

        // zero is not a divisor; the engine refuses and keeps the old value
        match monitor.set_coefficient(0) {
            Ok(applied) => println!("  applied divisor {applied}"),
            Err(e) => println!("  rejected: {e}"),
        }
        println!("  coefficient = {}\n", monitor.coefficient());
    }

    // "power cycle": a new monitor over the same store
    let mut monitor = DustMonitor::new(&clock, &latches, &mut store);
    println!("After power cycle:");
    println!("  coefficient = {} (from store)\n", monitor.coefficient());

    // the divisor scales every reported ratio; with no pulses both
    // channels still read zero regardless
    latches.store(ChannelId::Pm25, Level::High);
    monitor.update();
    println!("Snapshot:");
    print!("{}", monitor.snapshot());
}
