//! Great-circle distance math for proximity matching.
//!
//! Pure functions with no dependencies. Distances are kilometres on a sphere
//! of radius [`EARTH_RADIUS_KM`]. These are total functions over finite
//! inputs; callers are responsible for filtering out missing or non-finite
//! coordinates before calling.
//!
//! # Example
//!
//! ```
//! // Brisbane to Sydney, roughly 730 km.
//! let d = geo::distance_km(-27.47, 153.02, -33.87, 151.21);
//! assert!(d > 700.0 && d < 760.0);
//! ```

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points given as
/// latitude/longitude degrees, using the haversine formula.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Whether a latitude/longitude pair is usable for distance math: both
/// components finite and within the valid degree ranges.
pub fn is_valid_coord(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}
