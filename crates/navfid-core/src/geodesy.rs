use nalgebra::Vector3;

/// WGS-84 semi-major axis in meters.
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS-84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS-84 first eccentricity squared, `2f - f^2`.
pub const WGS84_ECCENTRICITY_SQ: f64 =
    2.0 * WGS84_FLATTENING - WGS84_FLATTENING * WGS84_FLATTENING;

/// Converts geodetic coordinates (degrees, meters) to earth-centered
/// earth-fixed Cartesian coordinates in meters on the WGS-84 ellipsoid.
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Vector3<f64> {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();

    // Radius of curvature in the prime vertical.
    let n = WGS84_SEMI_MAJOR_AXIS_M / (1.0 - WGS84_ECCENTRICITY_SQ * lat.sin().powi(2)).sqrt();

    Vector3::new(
        (n + alt_m) * lat.cos() * lon.cos(),
        (n + alt_m) * lat.cos() * lon.sin(),
        (n * (1.0 - WGS84_ECCENTRICITY_SQ) + alt_m) * lat.sin(),
    )
}
