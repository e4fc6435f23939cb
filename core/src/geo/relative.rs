use crate::prelude::GeoPosition;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters (haversine).
pub fn haversine_distance(from: &GeoPosition, to: &GeoPosition) -> f64 {
    let lat1 = from.latitude_deg.to_radians();
    let lat2 = to.latitude_deg.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (to.longitude_deg - from.longitude_deg).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Forward azimuth from `from` to `to`, radians clockwise from true north.
pub fn initial_bearing(from: &GeoPosition, to: &GeoPosition) -> f64 {
    let lat1 = from.latitude_deg.to_radians();
    let lat2 = to.latitude_deg.to_radians();
    let delta_lon = (to.longitude_deg - from.longitude_deg).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    y.atan2(x)
}

/// Returns `(east, north, vertical)` of `other` as seen from `ownship`, in
/// whole meters.
///
/// Range and bearing are projected onto a flat local plane, which only holds
/// over the few kilometers a traffic display cares about.
pub fn relative(ownship: &GeoPosition, other: &GeoPosition) -> (i64, i64, i64) {
    let distance = haversine_distance(ownship, other);
    let bearing = initial_bearing(ownship, other);

    let east = (distance * bearing.sin()).round() as i64;
    let north = (distance * bearing.cos()).round() as i64;
    let vertical = (other.altitude - ownship.altitude).round() as i64;

    (east, north, vertical)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(east: i64, north: i64) -> f64 {
        ((east * east + north * north) as f64).sqrt()
    }

    #[test]
    fn due_north_offset_projects_onto_north_axis() {
        let ownship = GeoPosition::new(45.0, 7.0, 1000.0);
        let other = GeoPosition::new(45.0009, 7.0, 1010.0);

        let (east, north, vertical) = relative(&ownship, &other);
        assert_eq!(east, 0);
        assert_eq!(north, 100);
        assert_eq!(vertical, 10);
    }

    #[test]
    fn due_east_offset_projects_onto_east_axis() {
        let ownship = GeoPosition::new(0.0, 0.0, 0.0);
        let other = GeoPosition::new(0.0, 0.01, 0.0);

        let (east, north, _) = relative(&ownship, &other);
        assert_eq!(north, 0);
        assert!((east - 1112).abs() <= 1, "east was {east}");
    }

    #[test]
    fn swapping_ownship_flips_vertical_and_keeps_range() {
        let a = GeoPosition::new(46.1234, 8.4321, 1200.0);
        let b = GeoPosition::new(46.1301, 8.4410, 1750.4);

        let (e_ab, n_ab, v_ab) = relative(&a, &b);
        let (e_ba, n_ba, v_ba) = relative(&b, &a);

        assert_eq!(v_ab, -v_ba);
        assert!((range(e_ab, n_ab) - range(e_ba, n_ba)).abs() <= 1.5);
        assert!(e_ab > 0 && n_ab > 0);
        assert!(e_ba < 0 && n_ba < 0);
    }

    #[test]
    fn identical_positions_are_zero() {
        let p = GeoPosition::new(-33.9, 151.2, 300.0);
        assert_eq!(relative(&p, &p), (0, 0, 0));
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }
}
