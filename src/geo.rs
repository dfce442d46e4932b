//! Great-circle helpers on a spherical earth.

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Point reached by travelling `distance` meters from (`lat`, `lng`) on the
/// initial `bearing` (degrees clockwise from north).
pub fn destination(lat: f64, lng: f64, bearing: f64, distance: f64) -> LatLng {
    let lat1 = lat.to_radians();
    let lng1 = lng.to_radians();
    let brg = bearing.to_radians();
    let delta = distance / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * brg.cos()).asin();
    let lng2 = lng1
        + (brg.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    LatLng {
        lat: lat2.to_degrees(),
        lng: lng2.to_degrees(),
    }
}

/// Vertices along a sector's arc, from `azimuth - beamwidth/2` to
/// `azimuth + beamwidth/2`, inclusive of both ends.
pub fn arc(center: LatLng, azimuth: f64, beamwidth: f64, range: f64, steps: usize) -> Vec<LatLng> {
    let steps = steps.max(1);
    let start = azimuth - beamwidth / 2.0;
    (0..=steps)
        .map(|j| {
            let angle = start + beamwidth * j as f64 / steps as f64;
            destination(center.lat, center.lng, angle, range)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_is_identity() {
        let p = destination(48.85, 2.35, 77.0, 0.0);
        assert!((p.lat - 48.85).abs() < 1e-12);
        assert!((p.lng - 2.35).abs() < 1e-12);
    }

    #[test]
    fn due_north_one_degree() {
        // One degree of latitude is R * pi / 180 meters.
        let d = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        let p = destination(0.0, 10.0, 0.0, d);
        assert!((p.lat - 1.0).abs() < 1e-9);
        assert!((p.lng - 10.0).abs() < 1e-9);
    }

    #[test]
    fn due_east_on_equator() {
        let d = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        let p = destination(0.0, 0.0, 90.0, d);
        assert!(p.lat.abs() < 1e-9);
        assert!((p.lng - 1.0).abs() < 1e-9);
    }

    #[test]
    fn arc_has_steps_plus_one_vertices() {
        let c = LatLng { lat: 45.0, lng: 5.0 };
        let pts = arc(c, 90.0, 60.0, 1000.0, 10);
        assert_eq!(pts.len(), 11);
        let first = destination(45.0, 5.0, 60.0, 1000.0);
        assert!((pts[0].lat - first.lat).abs() < 1e-12);
        let last = destination(45.0, 5.0, 120.0, 1000.0);
        assert!((pts[10].lng - last.lng).abs() < 1e-12);
    }
}
