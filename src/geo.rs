use chrono::NaiveDateTime;

/// Equatorial Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A latitude/longitude pair in degrees. Ranges are not validated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance using the haversine formula.
/// Input lat/lon in degrees. Output in kilometers.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (a.latitude - b.latitude).to_radians();
    let dlon = (a.longitude - b.longitude).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c / 1000.0
}

/// Average speed in km/h over `distance_km` covered between two timestamps.
///
/// Returns `None` when the distance is exactly zero. A zero time delta with a
/// non-zero distance yields an infinite speed; callers decide whether that is
/// acceptable.
pub fn speed_kmh(t1: NaiveDateTime, t2: NaiveDateTime, distance_km: f64) -> Option<f64> {
    if distance_km == 0.0 {
        return None;
    }
    let elapsed_s = (t1 - t2).num_seconds().unsigned_abs() as f64;
    Some(distance_km / elapsed_s * 3600.0)
}
