//! Traveled-distance accumulation for one hired session

use crate::core::Coordinate;
use crate::positioning::{FixOptions, PositionError, PositionSource, WatchHandle};

/// Synthetic distance added per positioning failure while hired (km), so
/// the fare keeps progressing when no fix is available.
pub const SYNTHETIC_STEP_KM: f64 = 0.001;

/// Cumulative traveled distance for one active hire.
///
/// Distance is the straight-line displacement from the trip's start
/// coordinate, not path-integrated length: a trip that goes out and comes
/// back reads a distance near zero. One accumulator lives per hired
/// session and is discarded when the session ends.
#[derive(Debug, Default)]
pub struct DistanceAccumulator {
    start_coordinate: Option<Coordinate>,
    last_coordinate: Option<Coordinate>,
    distance_km: f64,
    error: Option<String>,
    watch: Option<WatchHandle>,
}

impl DistanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the initial fix and begin continuous observation.
    ///
    /// An unsupported or denied capability is recorded as the current
    /// positioning error; the accumulator then advances only through the
    /// synthetic fallback.
    pub fn start(&mut self, source: &mut dyn PositionSource) {
        if let Err(e) = source.request_fix(&FixOptions::initial_fix()) {
            self.error = Some(e.to_string());
        }
        match source.watch(&FixOptions::watch_updates()) {
            Ok(handle) => self.watch = Some(handle),
            Err(e) => {
                log::warn!("continuous positioning unavailable: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Apply a successful fix. The first fix becomes both start and
    /// current coordinate with distance 0; later fixes recompute the
    /// displacement from the start. Clears any stored error.
    pub fn on_fix(&mut self, fix: Coordinate) {
        self.error = None;
        match self.start_coordinate {
            None => {
                self.start_coordinate = Some(fix);
                self.last_coordinate = Some(fix);
                self.distance_km = 0.0;
            }
            Some(start) => {
                self.last_coordinate = Some(fix);
                self.distance_km = start.distance_km(&fix);
            }
        }
    }

    /// Record a positioning failure. While hired, distance advances by the
    /// synthetic step so the meter never freezes.
    pub fn on_failure(&mut self, error: &PositionError, hired: bool) {
        self.error = Some(error.to_string());
        if hired {
            self.distance_km += SYNTHETIC_STEP_KM;
            log::debug!(
                "position fix failed ({}), synthetic distance now {:.3} km",
                error,
                self.distance_km
            );
        }
    }

    /// Cancel continuous observation. Idempotent; safe if never started.
    pub fn stop(&mut self, source: &mut dyn PositionSource) {
        if let Some(handle) = self.watch.take() {
            source.clear_watch(handle);
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn start_coordinate(&self) -> Option<&Coordinate> {
        self.start_coordinate.as_ref()
    }

    pub fn last_coordinate(&self) -> Option<&Coordinate> {
        self.last_coordinate.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether at least one successful fix has been received.
    pub fn has_fix(&self) -> bool {
        self.last_coordinate.is_some()
    }
}
