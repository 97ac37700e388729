//! Great-circle leg estimator (fallback when the routing oracle is down).
//!
//! Estimates road distance and travel time from straight-line distance and
//! an assumed average speed. Less accurate than a road network lookup but
//! always available.

use crate::polyline::Polyline;
use crate::traits::{LegSource, RouteLeg};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Straight-line leg estimator.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Haversine distance between two (lat, lon) points in kilometers.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lon1) = from;
        let (lat2, lon2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lon = (lon2 - lon1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }

    /// Builds an estimated leg with a two-point straight-line geometry.
    pub fn estimate(&self, from: (f64, f64), to: (f64, f64)) -> RouteLeg {
        let distance_km = Self::haversine_km(from, to);
        RouteLeg {
            distance_km,
            duration_min: self.km_to_minutes(distance_km),
            geometry: Polyline::new(vec![from, to]),
        }
    }
}

impl LegSource for HaversineEstimator {
    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> RouteLeg {
        self.estimate(from, to)
    }
}
