use crate::models::{Apartment, LatLon, ResolvedAlert};
use std::f64::consts::PI;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Click-to-point distance beyond which nothing counts as "near".
pub const NEAREST_THRESHOLD_METERS: f64 = 20_000.0;

pub trait Located {
    fn position(&self) -> LatLon;
}

impl Located for LatLon {
    fn position(&self) -> LatLon {
        *self
    }
}

impl Located for ResolvedAlert {
    fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }
}

impl Located for Apartment {
    fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lng)
    }
}

/// Great-circle distance in meters.
pub fn haversine_meters(a: LatLon, b: LatLon) -> f64 {
    let to_rad = |deg: f64| deg * PI / 180.0;

    let dlat = to_rad(b.lat - a.lat);
    let dlon = to_rad(b.lon - a.lon);

    let h = (dlat / 2.0).sin().powi(2)
        + to_rad(a.lat).cos() * to_rad(b.lat).cos() * (dlon / 2.0).sin().powi(2);

    EARTH_RADIUS_METERS * 2.0 * h.sqrt().min(1.0).asin()
}

/// Closest point to `click`, if it lies within `max_distance_m`.
/// The first of several equally close points wins.
pub fn find_nearest<'a, T: Located>(
    click: LatLon,
    points: &'a [T],
    max_distance_m: f64,
) -> Option<&'a T> {
    let mut best: Option<(&T, f64)> = None;
    for point in points {
        let distance = haversine_meters(click, point.position());
        if best.is_none_or(|(_, min)| distance < min) {
            best = Some((point, distance));
        }
    }
    best.filter(|(_, distance)| *distance <= max_distance_m)
        .map(|(point, _)| point)
}
