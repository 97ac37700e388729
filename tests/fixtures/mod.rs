//! Shared test fixtures: builders, fake collaborators, and real Leiria
//! stop locations.

#![allow(dead_code)]

pub mod leiria_stops;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};

use drt_planner::error::StoreError;
use drt_planner::model::{
    Request, RequestId, RequestStatus, Stop, StopId, Vehicle, VehicleId, VehicleRoute,
};
use drt_planner::polyline::Polyline;
use drt_planner::traits::{LegSource, PlanStore, RouteLeg};

pub fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 21)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

pub fn stop(id: &str, lat: f64, lon: f64) -> Stop {
    Stop {
        id: StopId::new(id),
        lat,
        lon,
    }
}

pub fn stop_at(id: &str, location: leiria_stops::Location) -> Stop {
    stop(id, location.0, location.1)
}

pub fn request(id: &str, origin: &str, dest: &str, pickup: NaiveDateTime) -> Request {
    Request {
        id: RequestId::new(id),
        origin_stop_id: StopId::new(origin),
        dest_stop_id: StopId::new(dest),
        requested_pickup_at: pickup,
        assigned_vehicle_id: None,
        status: RequestStatus::Pending,
    }
}

pub fn vehicle(id: &str, capacity: u32, lat: f64, lon: f64) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        capacity,
        lat,
        lon,
    }
}

pub fn stop_index(stops: &[Stop]) -> HashMap<StopId, Stop> {
    stops
        .iter()
        .map(|stop| (stop.id.clone(), stop.clone()))
        .collect()
}

/// Planar grid legs: 1 degree = 1 km, driven at 1 km/min. Predictable
/// numbers for assertions.
pub struct GridLegs;

impl LegSource for GridLegs {
    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> RouteLeg {
        let km = (from.0 - to.0).abs() + (from.1 - to.1).abs();
        RouteLeg {
            distance_km: km,
            duration_min: km,
            geometry: Polyline::new(vec![from, to]),
        }
    }
}

#[derive(Default)]
pub struct StoreState {
    pub stops: Vec<Stop>,
    pub vehicles: Vec<Vehicle>,
    pub requests: Vec<Request>,
    pub assignments: HashMap<RequestId, (Option<VehicleId>, RequestStatus)>,
    pub routes: Vec<VehicleRoute>,
}

/// In-memory store; clone the handle to inspect writes after a run.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new(stops: Vec<Stop>, vehicles: Vec<Vehicle>, requests: Vec<Request>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                stops,
                vehicles,
                requests,
                assignments: HashMap::new(),
                routes: Vec::new(),
            })),
        }
    }
}

impl PlanStore for InMemoryStore {
    fn load_stops(&self) -> Result<Vec<Stop>, StoreError> {
        Ok(self.state.lock().unwrap().stops.clone())
    }

    fn load_vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self.state.lock().unwrap().vehicles.clone())
    }

    fn load_requests(&self) -> Result<Vec<Request>, StoreError> {
        Ok(self.state.lock().unwrap().requests.clone())
    }

    fn save_assignment(
        &mut self,
        request_id: &RequestId,
        vehicle_id: Option<&VehicleId>,
        status: RequestStatus,
    ) -> Result<(), StoreError> {
        self.state
            .lock()
            .unwrap()
            .assignments
            .insert(request_id.clone(), (vehicle_id.cloned(), status));
        Ok(())
    }

    fn save_route(&mut self, route: &VehicleRoute) -> Result<(), StoreError> {
        self.state.lock().unwrap().routes.push(route.clone());
        Ok(())
    }
}
