use crate::common::Location;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate great-circle distance between two coordinates in kilometers
///
/// Uses the Haversine formula. Identical coordinates return exactly 0.0 and
/// antipodal points stay NaN-free: floating error can push the haversine term
/// fractionally past 1.0, so it is clamped before the sqrt/atan2 step.
pub fn distance_km(a: Location, b: Location) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }

    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lng: f64) -> Location {
        Location::new(lat, lng).unwrap()
    }

    #[test]
    fn same_point_is_exactly_zero() {
        let a = loc(10.762622, 106.660172);
        assert_eq!(distance_km(a, a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let minneapolis = loc(44.98, -93.27);
        let st_paul = loc(44.95, -93.09);
        assert_eq!(
            distance_km(minneapolis, st_paul),
            distance_km(st_paul, minneapolis)
        );
    }

    #[test]
    fn known_city_pair_distance() {
        // Minneapolis to St. Paul (≈16 km)
        let d = distance_km(loc(44.98, -93.27), loc(44.95, -93.09));
        assert!(d > 15.0 && d < 17.0, "got {}", d);
    }

    #[test]
    fn antipodal_points_are_finite_and_bounded() {
        // Half of Earth's circumference, no NaN from floating overshoot
        let d = distance_km(loc(0.0, 0.0), loc(0.0, 180.0));
        assert!(d.is_finite());
        assert!(d > 20000.0 && d <= 20016.0, "got {}", d);

        let d = distance_km(loc(90.0, 0.0), loc(-90.0, 0.0));
        assert!(d.is_finite());
        assert!(d > 20000.0 && d <= 20016.0, "got {}", d);
    }

    #[test]
    fn distance_is_non_negative() {
        let pairs = [
            (loc(0.0, 0.0), loc(0.0, 0.0)),
            (loc(10.0, 106.0), loc(10.001, 106.001)),
            (loc(-33.87, 151.21), loc(44.98, -93.27)),
        ];
        for (a, b) in pairs {
            assert!(distance_km(a, b) >= 0.0);
        }
    }

    #[test]
    fn sub_kilometer_resolution() {
        // ~100m apart in Ho Chi Minh City
        let d = distance_km(loc(10.0, 106.0), loc(10.001, 106.0));
        assert!(d > 0.1 && d < 0.12, "got {}", d);
    }
}
