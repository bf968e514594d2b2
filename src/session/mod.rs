//! Fare session state machine
//!
//! A session is either idle (for hire) or hired. While hired it is fed by
//! two external event producers: a 1 Hz elapsed-time tick and the position
//! feed. Both enter through explicit method calls on the single control
//! thread; a generation counter detects and drops callbacks that outlive
//! the session they belong to.

pub mod distance;

pub use distance::{DistanceAccumulator, SYNTHETIC_STEP_KM};

use crate::positioning::{PositionEvent, PositionSource};
use crate::tariff::FareSchedule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Callback function type for meter reading updates
pub type ReadingCallback = Box<dyn Fn(&MeterReading) + Send>;

/// Callback registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u32);

impl CallbackHandle {
    fn new(id: u32) -> Self {
        CallbackHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Observable meter state consumed by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Whether the meter is currently hired
    pub hired: bool,
    /// Metered fare (flag fall plus increments), excluding extras
    pub main_fare: f64,
    /// Manually entered surcharge ledger
    pub extras_fare: f64,
    /// Seconds elapsed since the hire started
    pub elapsed_seconds: u64,
    /// Displacement from the trip origin (km)
    pub distance_km: f64,
    /// Most recent positioning error, if positioning is degraded
    pub positioning_error: Option<String>,
    /// Whether at least one successful fix has been received
    pub has_fix: bool,
}

/// The fare meter state machine.
///
/// Owns the fare state, the per-hire `DistanceAccumulator`, and the wiring
/// to the position source. All fare recomputation goes through the fixed
/// `FareSchedule`; the presentation layer reads snapshots via `reading()`
/// or registered callbacks and never mutates state directly.
pub struct FareSession<S: PositionSource> {
    schedule: FareSchedule,
    source: S,
    distance: DistanceAccumulator,
    hired: bool,
    generation: u64,
    start_timestamp_ms: Option<u64>,
    elapsed_seconds: u64,
    main_fare: f64,
    extras_fare: f64,
    callback_counter: u32,
    reading_callbacks: HashMap<CallbackHandle, ReadingCallback>,
}

impl<S: PositionSource> FareSession<S> {
    /// Create an idle session billing on the fixed urban red-taxi tariff.
    pub fn new(source: S) -> Self {
        Self {
            schedule: FareSchedule::default(),
            source,
            distance: DistanceAccumulator::new(),
            hired: false,
            generation: 0,
            start_timestamp_ms: None,
            elapsed_seconds: 0,
            main_fare: 0.0,
            extras_fare: 0.0,
            callback_counter: 0,
            reading_callbacks: HashMap::new(),
        }
    }

    /// The tariff this session bills on.
    pub fn schedule(&self) -> &FareSchedule {
        &self.schedule
    }

    /// Current session generation. Timer callbacks must present this value
    /// to `tick()`; ticks from an earlier generation are dropped.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_hired(&self) -> bool {
        self.hired
    }

    /// Hire start time (milliseconds since epoch), while a hire is active.
    pub fn start_timestamp_ms(&self) -> Option<u64> {
        self.start_timestamp_ms
    }

    /// Direct access to the position source, for event injection in tests
    /// and simulations.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Snapshot of the observable meter state.
    pub fn reading(&self) -> MeterReading {
        MeterReading {
            hired: self.hired,
            main_fare: self.main_fare,
            extras_fare: self.extras_fare,
            elapsed_seconds: self.elapsed_seconds,
            distance_km: self.distance.distance_km(),
            positioning_error: self.distance.error().map(str::to_string),
            has_fix: self.distance.has_fix(),
        }
    }

    /// Transition Idle -> Hired: the meter drops the flag.
    ///
    /// Resets elapsed time and distance, charges the flag fall
    /// immediately, and starts positioning with a fresh accumulator.
    /// No-op if already hired.
    pub fn start_hire(&mut self) {
        if self.hired {
            return;
        }

        self.generation += 1;
        self.hired = true;
        self.start_timestamp_ms = Some(now_ms());
        self.elapsed_seconds = 0;
        self.main_fare = self.schedule.flag_fall_charge;

        self.distance = DistanceAccumulator::new();
        self.distance.start(&mut self.source);

        log::info!(
            "hire started (generation {}), flag fall {:.1}",
            self.generation,
            self.main_fare
        );
        self.publish();
    }

    /// Transition Hired -> Idle.
    ///
    /// Stops positioning and the tick stream; fare values stay at their
    /// last computed amounts so the rider can read the final charge.
    /// No-op if already idle.
    pub fn stop_hire(&mut self) {
        if !self.hired {
            return;
        }

        self.hired = false;
        // Late timer callbacks from the ended hire present a stale
        // generation and are dropped.
        self.generation += 1;
        self.distance.stop(&mut self.source);

        log::info!(
            "hire stopped at fare {:.1} (+{:.1} extras), {:.3} km, {} s",
            self.main_fare,
            self.extras_fare,
            self.distance.distance_km(),
            self.elapsed_seconds
        );
        self.publish();
    }

    /// 1 Hz elapsed-time tick from the external timer.
    ///
    /// Dropped unless the session is hired and `generation` matches the
    /// current hire.
    pub fn tick(&mut self, generation: u64) {
        if !self.hired || generation != self.generation {
            return;
        }

        self.elapsed_seconds += 1;
        self.recompute();
    }

    /// Drain pending position events in arrival order.
    ///
    /// While hired, fixes and failures feed the accumulator and the fare
    /// is recomputed after each. While idle, stale deliveries are drained
    /// and discarded. Returns the number of events applied.
    pub fn process_position_events(&mut self) -> usize {
        let mut applied = 0;

        while let Some(event) = self.source.poll() {
            if !self.hired {
                continue;
            }
            match event {
                PositionEvent::Fix(fix) => self.distance.on_fix(fix),
                PositionEvent::Failed(error) => self.distance.on_failure(&error, self.hired),
            }
            applied += 1;
            self.recompute();
        }

        applied
    }

    /// Add a surcharge to the extras ledger. Permitted in either state;
    /// non-finite amounts are ignored so the ledger cannot be corrupted.
    pub fn add_extra(&mut self, amount: f64) {
        if !amount.is_finite() {
            return;
        }

        self.extras_fare += amount;
        self.publish();
    }

    /// Clear the extras ledger. Permitted in either state.
    pub fn reset_extras(&mut self) {
        self.extras_fare = 0.0;
        self.publish();
    }

    /// Hard reset from any state: forces Idle, zeroes all fare and trip
    /// state, and stops positioning.
    pub fn reset_all(&mut self) {
        self.distance.stop(&mut self.source);
        self.generation += 1;
        self.hired = false;
        self.start_timestamp_ms = None;
        self.elapsed_seconds = 0;
        self.main_fare = 0.0;
        self.extras_fare = 0.0;
        self.distance = DistanceAccumulator::new();

        log::info!("meter reset");
        self.publish();
    }

    /// Register a callback invoked on every reading republish.
    pub fn register_reading_callback(&mut self, callback: ReadingCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.reading_callbacks.insert(handle, callback);
        handle
    }

    /// Unregister a reading callback.
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> bool {
        self.reading_callbacks.remove(&handle).is_some()
    }

    /// Recompute the metered fare from the latest distance and elapsed
    /// time. Idempotent; always uses the current values of both.
    fn recompute(&mut self) {
        self.main_fare = self
            .schedule
            .compute_main_fare(self.distance.distance_km(), self.elapsed_seconds as f64 / 60.0);
        self.publish();
    }

    fn publish(&self) {
        let reading = self.reading();
        for callback in self.reading_callbacks.values() {
            callback(&reading);
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
