//! Physical constants and system parameters

/// Mean Earth radius used for great-circle distance calculations (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;
