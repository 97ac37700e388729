//! Insertion cost model.
//!
//! Scores a feasible pickup/dropoff insertion as a weighted sum of added
//! distance, relative detour, and three bonuses (occupancy, temporal
//! clustering, stop reuse). Lower is better; bonuses are negative terms.
//! The route builder produces the inputs by simulating the insertion.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::config::CostWeights;

/// Pickups within this many minutes of each other earn a clustering bonus.
const TIME_CLUSTER_WINDOW_MIN: f64 = 10.0;

/// Measured effects of one candidate insertion on a route.
#[derive(Debug, Clone, Copy)]
pub struct InsertionEffects {
    /// Extra road distance caused by the insertion. Always non-negative.
    pub added_distance_km: f64,
    /// Route distance with the candidate over distance without it
    /// (1.0 for an empty route).
    pub detour_ratio: f64,
    /// Requests on the vehicle once the candidate is committed.
    pub passengers_after: u32,
    /// Clustering bonus input, see [`temporal_proximity`].
    pub temporal_proximity_min: f64,
    /// Candidate shares a stop id with an existing route stop.
    pub reuses_stop: bool,
}

/// Weighted scalar cost of an insertion. Lower wins.
pub fn score(weights: &CostWeights, effects: &InsertionEffects) -> f64 {
    weights.distance * effects.added_distance_km
        + weights.detour * effects.detour_ratio
        - weights.utilization * f64::from(effects.passengers_after)
        - weights.time_cluster * effects.temporal_proximity_min
        - weights.stop_reuse * if effects.reuses_stop { 1.0 } else { 0.0 }
}

/// How close the candidate's requested pickup time sits to the route's
/// existing pickups: `max(0, window - avg |delta| minutes)`, so requests
/// batched within the window score up to `window`.
pub fn temporal_proximity(candidate: NaiveDateTime, existing_pickups: &[NaiveDateTime]) -> f64 {
    if existing_pickups.is_empty() {
        return 0.0;
    }

    let total_diff_min: f64 = existing_pickups
        .iter()
        .map(|existing| {
            let diff = (candidate - *existing).num_seconds().abs() as f64;
            diff / 60.0
        })
        .sum();
    let avg_diff_min = total_diff_min / existing_pickups.len() as f64;

    (TIME_CLUSTER_WINDOW_MIN - avg_diff_min).max(0.0)
}

/// Deterministic candidate ordering: lowest score, then lowest absolute
/// added distance. Callers break remaining ties by vehicle id and insertion
/// indices so a run is reproducible.
pub fn compare(a_score: f64, a_added_km: f64, b_score: f64, b_added_km: f64) -> Ordering {
    a_score
        .total_cmp(&b_score)
        .then(a_added_km.abs().total_cmp(&b_added_km.abs()))
}
