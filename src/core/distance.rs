use crate::models::Coordinate;

/// Earth's radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the great-circle (haversine) distance between two coordinates
///
/// # Arguments
/// * `from` - First coordinate in decimal degrees
/// * `to` - Second coordinate in decimal degrees
///
/// # Returns
/// Distance in meters. The result is non-negative and symmetric in its
/// arguments; the distance from a coordinate to itself is zero up to
/// floating-point rounding. Behavior for non-finite input is unspecified.
#[inline]
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
