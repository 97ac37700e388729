//! Decoded route geometry.
//!
//! The planner works with geometry as plain (latitude, longitude) point
//! sequences. Encoding to a compact wire format is a presentation concern
//! and happens outside this crate.

use serde::{Deserialize, Serialize};

/// A route geometry as decoded coordinate points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Creates a polyline from (latitude, longitude) points.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a leg's geometry, skipping the joint point when it repeats
    /// the current endpoint.
    pub fn append_leg(&mut self, leg: &Polyline) {
        let mut points = leg.points.iter().copied();
        if let (Some(last), Some(first)) = (self.points.last(), leg.points.first()) {
            if last == first {
                points.next();
            }
        }
        self.points.extend(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_points() {
        let points = vec![(39.74, -8.81), (39.75, -8.80)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.points(), &points[..]);
    }

    #[test]
    fn into_points_returns_owned() {
        let points = vec![(39.74, -8.81), (39.75, -8.80)];
        let polyline = Polyline::new(points.clone());
        assert_eq!(polyline.into_points(), points);
    }

    #[test]
    fn append_leg_skips_repeated_joint() {
        let mut route = Polyline::new(vec![(0.0, 0.0), (1.0, 1.0)]);
        route.append_leg(&Polyline::new(vec![(1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(route.points(), &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn append_leg_keeps_distinct_joint() {
        let mut route = Polyline::new(vec![(0.0, 0.0)]);
        route.append_leg(&Polyline::new(vec![(1.0, 1.0)]));
        assert_eq!(route.points(), &[(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn empty_polyline() {
        assert!(Polyline::default().is_empty());
    }
}
