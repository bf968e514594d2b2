//! Fare schedule and metered fare computation
//!
//! Implements the tiered incremental-charge tariff for urban red taxis
//! (July 2024 fares). The schedule is a fixed table: it is constructed once
//! and never mutated for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Tolerance for floating-point comparisons on fare and increment
/// arithmetic. Absorbs binary rounding noise from the km-to-metre
/// conversion and from repeated tier-charge additions.
const FARE_EPS: f64 = 1e-9;

/// Tiered incremental-charge schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareSchedule {
    /// Fixed starting charge covering the flag-fall distance
    pub flag_fall_charge: f64,
    /// Distance covered by the flag fall (km)
    pub flag_fall_distance_km: f64,
    /// Billable distance unit beyond the flag fall (metres)
    pub distance_increment_m: f64,
    /// Billable waiting-time unit (minutes)
    pub waiting_increment_min: f64,
    /// Per-increment charge while the running fare is below the threshold
    pub tier1_charge: f64,
    /// Per-increment charge once the running fare reaches the threshold
    pub tier2_charge: f64,
    /// Running-fare threshold separating the two tiers
    pub tier1_fare_threshold: f64,
}

impl Default for FareSchedule {
    fn default() -> Self {
        Self::urban_red()
    }
}

impl FareSchedule {
    /// The published urban red taxi tariff (July 2024 fares, HK$).
    pub fn urban_red() -> Self {
        Self {
            flag_fall_charge: 29.0,
            flag_fall_distance_km: 2.0,
            distance_increment_m: 200.0,
            waiting_increment_min: 1.0,
            tier1_charge: 2.1,
            tier2_charge: 1.4,
            tier1_fare_threshold: 102.5,
        }
    }

    /// Compute the metered fare (excluding extras) for a traveled distance
    /// and accumulated waiting time.
    ///
    /// Non-finite or negative inputs are coerced to 0 so the meter always
    /// produces a number. Distance increments are priced before waiting
    /// increments, and each increment is billed at the tier selected by the
    /// running total after all prior increments. The result is rounded to
    /// one decimal place, once, at the end.
    pub fn compute_main_fare(&self, distance_km: f64, waiting_min: f64) -> f64 {
        let distance_km = sanitize(distance_km);
        let waiting_min = sanitize(waiting_min);

        if distance_km <= 0.0 && waiting_min <= 0.0 {
            return 0.0;
        }

        let mut fare = self.flag_fall_charge;

        let billable_km = (distance_km - self.flag_fall_distance_km).max(0.0);
        let distance_increments = if billable_km > 0.0 {
            ceil_increments(billable_km * 1000.0, self.distance_increment_m)
        } else {
            0
        };
        let waiting_increments = if waiting_min > 0.0 {
            ceil_increments(waiting_min, self.waiting_increment_min)
        } else {
            0
        };

        for _ in 0..distance_increments {
            fare += self.increment_charge(fare);
        }
        for _ in 0..waiting_increments {
            fare += self.increment_charge(fare);
        }

        round_to_tenth(fare)
    }

    /// Per-increment charge for the current running fare.
    fn increment_charge(&self, running_fare: f64) -> f64 {
        if running_fare < self.tier1_fare_threshold - FARE_EPS {
            self.tier1_charge
        } else {
            self.tier2_charge
        }
    }
}

/// Coerce non-finite and negative inputs to 0.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Number of started billing units in `amount`. A partial unit counts as a
/// whole one; the epsilon keeps an exact multiple from spilling into an
/// extra unit through float noise.
fn ceil_increments(amount: f64, unit: f64) -> u64 {
    (amount / unit - FARE_EPS).ceil().max(0.0) as u64
}

/// Round to one decimal place, half away from zero.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> FareSchedule {
        FareSchedule::default()
    }

    #[test]
    fn test_no_fare_before_meter_runs() {
        assert_eq!(schedule().compute_main_fare(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_flag_fall_only_within_covered_distance() {
        // 2 km is fully covered by the flag fall; no increments yet
        assert_eq!(schedule().compute_main_fare(2.0, 0.0), 29.0);
        assert_eq!(schedule().compute_main_fare(1.3, 0.0), 29.0);
    }

    #[test]
    fn test_single_distance_increment() {
        // 2.2 km is exactly one started 200 m segment past the flag fall
        assert_eq!(schedule().compute_main_fare(2.2, 0.0), 31.1);
    }

    #[test]
    fn test_partial_increment_rounds_up() {
        // 2.01 km starts a segment, so the full increment is billed
        assert_eq!(schedule().compute_main_fare(2.01, 0.0), 31.1);
    }

    #[test]
    fn test_waiting_time_increments() {
        // Any started minute bills a full waiting increment
        assert_eq!(schedule().compute_main_fare(0.0, 0.5), 31.1);
        assert_eq!(schedule().compute_main_fare(0.0, 1.0), 31.1);
        assert_eq!(schedule().compute_main_fare(0.0, 5.0), 39.5);
    }

    #[test]
    fn test_tier_switch_after_35_increments() {
        // 35 tier-1 increments take the fare from 29.0 to exactly the
        // 102.5 threshold; the 36th bills at the tier-2 rate.
        let s = schedule();
        let at_threshold = s.compute_main_fare(2.0 + 0.2 * 35.0, 0.0);
        assert_eq!(at_threshold, 102.5);
        let one_past = s.compute_main_fare(2.0 + 0.2 * 36.0, 0.0);
        assert_eq!(one_past, 103.9);
        assert_eq!(round_to_tenth(one_past - at_threshold), 1.4);
    }

    #[test]
    fn test_fare_non_decreasing_in_distance() {
        let s = schedule();
        let mut previous = 0.0;
        for n in 0..120 {
            let fare = s.compute_main_fare(2.0 + 0.2 * n as f64, 0.0);
            assert!(fare >= previous, "fare decreased at increment {}", n);
            previous = fare;
        }
    }

    #[test]
    fn test_distance_priced_before_waiting() {
        // Distance lifts the running fare to the threshold, so the waiting
        // minute that follows bills at the tier-2 rate.
        let s = schedule();
        assert_eq!(s.compute_main_fare(9.0, 1.0), 103.9);
    }

    #[test]
    fn test_rounding_is_idempotent() {
        let s = schedule();
        for n in 0..80 {
            let fare = s.compute_main_fare(2.0 + 0.2 * n as f64, n as f64 * 0.7);
            assert_eq!(fare, round_to_tenth(fare));
        }
    }

    #[test]
    fn test_invalid_inputs_coerced_to_zero() {
        let s = schedule();
        assert_eq!(s.compute_main_fare(-5.0, -3.0), 0.0);
        assert_eq!(s.compute_main_fare(f64::NAN, f64::NEG_INFINITY), 0.0);
        // A bad distance with valid waiting still bills the waiting side
        assert_eq!(s.compute_main_fare(f64::NAN, 1.0), 31.1);
    }
}
