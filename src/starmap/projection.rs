//! Astrometry conversions and sky projection
//!
//! Angles are in degrees at the API boundary, distances in light-years.

use glam::{DVec2, DVec3};

/// Light-years per parsec
pub const PARSEC_TO_LY: f64 = 3.26156;

/// Catalog astrometry (ra, dec in degrees; parallax in milliarcseconds) to
/// cartesian light-years with dec as latitude.
///
/// `parallax_mas` must be positive; callers filter non-positive or
/// low-quality parallaxes before converting.
pub fn to_galactocentric(ra_deg: f64, dec_deg: f64, parallax_mas: f64) -> DVec3 {
    let dist_ly = 1000.0 / parallax_mas * PARSEC_TO_LY;
    let ra = ra_deg.to_radians();
    let dec = dec_deg.to_radians();
    DVec3::new(
        dist_ly * dec.cos() * ra.cos(),
        dist_ly * dec.cos() * ra.sin(),
        dist_ly * dec.sin(),
    )
}

/// Direction of a cartesian point as (lon in [0, 360), lat in [-90, 90])
pub fn galactic_lon_lat(p: DVec3) -> (f64, f64) {
    let r = p.length();
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let mut lon = p.y.atan2(p.x).to_degrees();
    if lon < 0.0 {
        lon += 360.0;
    }
    if lon >= 360.0 {
        lon -= 360.0;
    }
    let lat = (p.z / r).clamp(-1.0, 1.0).asin().to_degrees();
    (lon, lat)
}

/// Great-circle separation in degrees (haversine)
pub fn angular_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = phi2 - phi1;
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    (2.0 * a.sqrt().clamp(0.0, 1.0).asin()).to_degrees()
}

/// Tangent-plane projection of (lon, lat) onto the plane touching the sky
/// at (center_lon, center_lat).
///
/// Returns `None` for points at or behind 90° from the view direction.
/// Plane units are tangents: 1.0 is 45° off-axis.
pub fn gnomonic(lon: f64, lat: f64, center_lon: f64, center_lat: f64) -> Option<DVec2> {
    let (phi, phi0) = (lat.to_radians(), center_lat.to_radians());
    let d_lambda = (lon - center_lon).to_radians();
    let cos_c = phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * d_lambda.cos();
    if cos_c <= 0.0 {
        return None;
    }
    Some(DVec2::new(
        phi.cos() * d_lambda.sin() / cos_c,
        (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * d_lambda.cos()) / cos_c,
    ))
}

/// Map tangent-plane coordinates to pixels for a horizontal field of view
/// of `fov_deg` on a `width` x `height` screen (north up)
pub fn tangent_to_screen(p: DVec2, fov_deg: f64, width: f64, height: f64) -> DVec2 {
    let scale = (width * 0.5) / (fov_deg.to_radians() * 0.5).tan();
    DVec2::new(width * 0.5 + p.x * scale, height * 0.5 - p.y * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_one_parsec_along_x() {
        let p = to_galactocentric(0.0, 0.0, 1000.0);
        assert!((p.x - PARSEC_TO_LY).abs() < EPS);
        assert!(p.y.abs() < EPS && p.z.abs() < EPS);
    }

    #[test]
    fn test_pole() {
        let p = to_galactocentric(123.0, 90.0, 500.0);
        assert!((p.z - 2.0 * PARSEC_TO_LY).abs() < EPS);
        let (_, lat) = galactic_lon_lat(p);
        assert!((lat - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lon_is_normalized() {
        let (lon, lat) = galactic_lon_lat(DVec3::new(0.0, -1.0, 0.0));
        assert!((lon - 270.0).abs() < EPS);
        assert!(lat.abs() < EPS);
        let (lon, _) = galactic_lon_lat(DVec3::new(1.0, -1e-12, 0.0));
        assert!((0.0..360.0).contains(&lon));
    }

    #[test]
    fn test_round_trip_ra_dec() {
        let p = to_galactocentric(219.9, -60.83, 747.1);
        let (lon, lat) = galactic_lon_lat(p);
        assert!((lon - 219.9).abs() < 1e-6);
        assert!((lat + 60.83).abs() < 1e-6);
    }

    #[test]
    fn test_angular_distance() {
        assert!((angular_distance(0.0, 0.0, 90.0, 0.0) - 90.0).abs() < 1e-9);
        assert!((angular_distance(10.0, 89.0, 190.0, 89.0) - 2.0).abs() < 1e-9);
        assert!(angular_distance(42.0, -7.0, 42.0, -7.0).abs() < 1e-9);
    }

    #[test]
    fn test_gnomonic_center_and_behind() {
        let c = gnomonic(30.0, 10.0, 30.0, 10.0).unwrap();
        assert!(c.length() < EPS);
        let p = gnomonic(75.0, 0.0, 30.0, 0.0).unwrap();
        assert!((p.x - 1.0).abs() < 1e-9);
        assert!(gnomonic(210.0, -10.0, 30.0, 10.0).is_none());
        assert!(gnomonic(121.0, 0.0, 30.0, 0.0).is_none());
    }

    #[test]
    fn test_tangent_to_screen_edges() {
        // 45° off-axis with a 90° fov lands on the right edge
        let s = tangent_to_screen(DVec2::new(1.0, 0.0), 90.0, 200.0, 100.0);
        assert!((s.x - 200.0).abs() < 1e-9);
        assert!((s.y - 50.0).abs() < 1e-9);
    }
}
