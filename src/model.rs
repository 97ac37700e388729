//! Domain data model for demand-responsive transport planning.

use std::fmt::{self, Display};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(StopId);
define_id!(RequestId);
define_id!(VehicleId);

/// A fixed boarding point. Reference data, never mutated by the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub lat: f64,
    pub lon: f64,
}

impl Stop {
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Assigned,
    Rejected,
}

/// A validated ride request supplied by the intake collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub origin_stop_id: StopId,
    pub dest_stop_id: StopId,
    pub requested_pickup_at: NaiveDateTime,
    #[serde(default)]
    pub assigned_vehicle_id: Option<VehicleId>,
    pub status: RequestStatus,
}

/// A vehicle's state at the start of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub capacity: u32,
    pub lat: f64,
    pub lon: f64,
}

impl Vehicle {
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Pickup,
    Dropoff,
}

/// One ordered element of a vehicle's stop sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteStop {
    pub stop_id: StopId,
    pub kind: StopKind,
    pub request_id: RequestId,
    pub eta: NaiveDateTime,
    pub sequence_index: usize,
}

/// A finalized per-vehicle plan with aggregate metrics attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle_id: VehicleId,
    pub stops: Vec<RouteStop>,
    pub total_distance_km: f64,
    pub total_duration_min: f64,
    pub passenger_count: u32,
    pub fuel_liters: f64,
    pub co2_kg: f64,
    /// Concatenated leg geometry for the presentation layer.
    pub geometry: Polyline,
}

/// Fuel and CO2 figures derived from route distance and occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalMetrics {
    pub fuel_liters: f64,
    pub co2_kg: f64,
    pub per_passenger_fuel_liters: f64,
    pub per_passenger_co2_kg: f64,
}
