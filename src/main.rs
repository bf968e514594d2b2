//! Demo binary: drives a scripted trip through the fare session state
//! machine and prints the meter readings the presentation layer would
//! render. `--unsupported` simulates a device without positioning, so the
//! meter bills on the time-based fallback.

use taximeter::{FareSession, MeterReading, MockPositionSource, PositionError};

/// One scripted GPS fix: seconds into the trip, latitude, longitude.
const TRIP_FIXES: &[(u64, f64, f64)] = &[
    (2, 22.3193, 114.1694),  // pick-up: Mong Kok
    (30, 22.3151, 114.1700),
    (60, 22.3112, 114.1712),
    (120, 22.3048, 114.1721),
    (180, 22.2976, 114.1722), // Tsim Sha Tsui waterfront
    (240, 22.2920, 114.1730),
];

fn print_reading(label: &str, reading: &MeterReading) -> Result<(), serde_json::Error> {
    println!("[{:>4}] {}", label, serde_json::to_string(reading)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let unsupported = args.iter().any(|arg| arg == "--unsupported");

    let source = if unsupported {
        MockPositionSource::unsupported()
    } else {
        MockPositionSource::new()
    };
    let mut session = FareSession::new(source);

    println!("Taxi fare meter demo (urban red taxi tariff)");
    session.start_hire();
    print_reading("0s", &session.reading())?;

    // Simulate a 5 minute trip at one tick per second, with position
    // fixes (or fix failures) arriving along the way.
    let mut next_fix = 0;
    for second in 1..=300u64 {
        session.tick(session.generation());

        if unsupported {
            // No positioning capability: a failed fix every 10 s drives
            // the synthetic fallback
            if second % 10 == 0 {
                session
                    .source_mut()
                    .push_failure(PositionError::Timeout { timeout_ms: 5_000 });
            }
        } else if next_fix < TRIP_FIXES.len() && TRIP_FIXES[next_fix].0 <= second {
            let (_, latitude, longitude) = TRIP_FIXES[next_fix];
            session
                .source_mut()
                .push_fix(latitude, longitude, second * 1_000);
            next_fix += 1;
        }
        session.process_position_events();

        if second % 60 == 0 {
            print_reading(&format!("{}s", second), &session.reading())?;
        }
    }

    session.add_extra(10.0); // luggage
    session.stop_hire();
    print_reading("end", &session.reading())?;

    let final_reading = session.reading();
    println!(
        "Total due: HK${:.1} (fare {:.1} + extras {:.1})",
        final_reading.main_fare + final_reading.extras_fare,
        final_reading.main_fare,
        final_reading.extras_fare
    );

    session.reset_all();
    Ok(())
}
