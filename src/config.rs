//! Configuration surface: constraint limits, cost weights, impact factors,
//! and the optimization time window.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PlanError;

/// Most stops a single route query may carry, imposed by the geo oracle.
pub const MAX_ROUTE_STOPS: usize = 23;

/// Caller-tunable limit bounds, matching the deployment's operator controls.
const WAITING_MINUTES_RANGE: (i64, i64) = (5, 120);
const TRIP_MINUTES_RANGE: (i64, i64) = (15, 180);

/// Weights for the insertion cost terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostWeights {
    /// Extra road distance caused by the insertion (dominant term).
    pub distance: f64,
    /// Relative route lengthening (with / without the candidate).
    pub detour: f64,
    /// Occupancy bonus per passenger already on board.
    pub utilization: f64,
    /// Bonus for pickups clustered in time.
    pub time_cluster: f64,
    /// Bonus for reusing a stop already on the route.
    pub stop_reuse: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            distance: 2.0,
            detour: 0.5,
            utilization: 0.1,
            time_cluster: 0.02,
            stop_reuse: 0.2,
        }
    }
}

/// Fuel and emission constants for the impact tracker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImpactFactors {
    pub fuel_l_per_100km: f64,
    pub co2_kg_per_liter: f64,
}

impl Default for ImpactFactors {
    fn default() -> Self {
        Self {
            fuel_l_per_100km: 8.0,
            co2_kg_per_liter: 2.31,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Largest allowed span between the earliest and latest pickup ETA on
    /// one vehicle, in minutes.
    pub max_waiting_minutes: i64,
    /// Largest allowed pickup-to-dropoff span per passenger, in minutes.
    pub max_trip_duration_minutes: i64,
    /// Most requests one vehicle may carry in a run.
    pub max_requests_per_vehicle: usize,
    pub weights: CostWeights,
    pub impact: ImpactFactors,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_waiting_minutes: 15,
            max_trip_duration_minutes: 20,
            max_requests_per_vehicle: 20,
            weights: CostWeights::default(),
            impact: ImpactFactors::default(),
        }
    }
}

impl PlannerConfig {
    /// Rejects non-positive or out-of-range limits before a run starts.
    pub fn validate(&self) -> Result<(), PlanError> {
        let (wait_min, wait_max) = WAITING_MINUTES_RANGE;
        if self.max_waiting_minutes < wait_min || self.max_waiting_minutes > wait_max {
            return Err(PlanError::InvalidConstraint(format!(
                "max_waiting_minutes must be within {}..={}, got {}",
                wait_min, wait_max, self.max_waiting_minutes
            )));
        }
        let (trip_min, trip_max) = TRIP_MINUTES_RANGE;
        if self.max_trip_duration_minutes < trip_min || self.max_trip_duration_minutes > trip_max {
            return Err(PlanError::InvalidConstraint(format!(
                "max_trip_duration_minutes must be within {}..={}, got {}",
                trip_min, trip_max, self.max_trip_duration_minutes
            )));
        }
        if self.max_requests_per_vehicle == 0 {
            return Err(PlanError::InvalidConstraint(
                "max_requests_per_vehicle must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Inclusive filter over requested pickup times for one run: both bounds
/// admit a request landing exactly on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The default operating window for a service day, 07:00 to 19:00.
    pub fn service_day(date: NaiveDate) -> Self {
        Self {
            start: date.and_time(NaiveTime::from_hms_opt(7, 0, 0).unwrap()),
            end: date.and_time(NaiveTime::from_hms_opt(19, 0, 0).unwrap()),
        }
    }

    /// Swaps inverted bounds instead of failing, matching operator
    /// expectations for fat-fingered filter input.
    pub fn normalized(self) -> Self {
        if self.start > self.end {
            warn!(
                start = %self.start,
                end = %self.end,
                "time window bounds inverted, swapping",
            );
            Self {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}
