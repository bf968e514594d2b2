//! Taxi Fare Meter
//!
//! Core state machine for a simulated taxi fare meter: a hired session
//! accumulates elapsed time and traveled distance (device positioning or a
//! time-based fallback) and converts them into a fare using a tiered
//! incremental-charge schedule.

pub mod core;
pub mod tariff;
pub mod positioning;
pub mod session;

// Re-export commonly used types
pub use crate::core::{Coordinate, EARTH_RADIUS_KM};
pub use tariff::FareSchedule;
pub use positioning::{
    FixOptions, MockPositionSource, PositionError, PositionEvent, PositionResult, PositionSource,
    WatchHandle,
};
pub use session::{
    CallbackHandle, DistanceAccumulator, FareSession, MeterReading, ReadingCallback,
    SYNTHETIC_STEP_KM,
};
