//! Per-vehicle route construction via cost-guided insertion.
//!
//! A [`RoutePlan`] holds one vehicle's ordered pickup/dropoff sequence for
//! the duration of a run. [`RoutePlan::best_insertion`] enumerates every
//! pickup/dropoff index pair for a candidate request, simulates the
//! resulting schedule, and returns the cheapest feasible insertion. ETAs
//! are anchored on the first pickup's requested time; the vehicle waits at
//! any pickup it reaches early.

use chrono::{Duration, NaiveDateTime};

use crate::config::{PlannerConfig, MAX_ROUTE_STOPS};
use crate::cost::{self, InsertionEffects};
use crate::impact;
use crate::model::{Request, RouteStop, Stop, StopKind, Vehicle, VehicleRoute};
use crate::polyline::Polyline;
use crate::traits::LegSource;

#[derive(Debug, Clone)]
struct PlannedStop {
    stop_id: crate::model::StopId,
    kind: StopKind,
    request_id: crate::model::RequestId,
    coords: (f64, f64),
    requested_pickup_at: NaiveDateTime,
    eta: NaiveDateTime,
}

/// Schedule produced by simulating a candidate sequence.
#[derive(Debug, Clone)]
struct SimulatedPlan {
    stops: Vec<PlannedStop>,
    total_distance_km: f64,
    total_duration_min: f64,
}

/// The cheapest feasible way to insert one request into a plan.
///
/// Carries the simulated schedule so committing never re-runs the oracle.
#[derive(Debug, Clone)]
pub struct Insertion {
    pub pickup_index: usize,
    pub dropoff_index: usize,
    pub score: f64,
    pub added_distance_km: f64,
    applied: SimulatedPlan,
}

/// One vehicle's in-progress stop sequence during a run.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    vehicle: Vehicle,
    stops: Vec<PlannedStop>,
    total_distance_km: f64,
    total_duration_min: f64,
    request_count: u32,
}

impl RoutePlan {
    /// An empty plan anchored at the vehicle's start position.
    pub fn new(vehicle: Vehicle) -> Self {
        Self {
            vehicle,
            stops: Vec::new(),
            total_distance_km: 0.0,
            total_duration_min: 0.0,
            request_count: 0,
        }
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn request_count(&self) -> u32 {
        self.request_count
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Finds the cheapest feasible pickup/dropoff index pair for `request`,
    /// or `None` when every pair violates a constraint.
    pub fn best_insertion(
        &self,
        request: &Request,
        origin: &Stop,
        dest: &Stop,
        legs: &dyn LegSource,
        config: &PlannerConfig,
    ) -> Option<Insertion> {
        if self.request_count as usize >= config.max_requests_per_vehicle {
            return None;
        }
        if self.stops.len() + 2 > MAX_ROUTE_STOPS {
            return None;
        }

        let pickup = PlannedStop {
            stop_id: origin.id.clone(),
            kind: StopKind::Pickup,
            request_id: request.id.clone(),
            coords: origin.coords(),
            requested_pickup_at: request.requested_pickup_at,
            eta: request.requested_pickup_at,
        };
        let dropoff = PlannedStop {
            stop_id: dest.id.clone(),
            kind: StopKind::Dropoff,
            request_id: request.id.clone(),
            coords: dest.coords(),
            requested_pickup_at: request.requested_pickup_at,
            eta: request.requested_pickup_at,
        };

        let existing_pickup_times: Vec<NaiveDateTime> = self
            .stops
            .iter()
            .filter(|stop| stop.kind == StopKind::Pickup)
            .map(|stop| stop.requested_pickup_at)
            .collect();
        let reuses_stop = self
            .stops
            .iter()
            .any(|stop| stop.stop_id == origin.id || stop.stop_id == dest.id);

        let n = self.stops.len();
        let mut best: Option<Insertion> = None;

        for pickup_index in 0..=n {
            for dropoff_index in pickup_index + 1..=n + 1 {
                let mut candidate = self.stops.clone();
                candidate.insert(pickup_index, pickup.clone());
                candidate.insert(dropoff_index, dropoff.clone());

                let Some(simulated) = self.simulate(candidate, legs, config) else {
                    continue;
                };

                let added_distance_km = simulated.total_distance_km - self.total_distance_km;
                let detour_ratio = if self.total_distance_km > 0.0 {
                    simulated.total_distance_km / self.total_distance_km
                } else {
                    1.0
                };
                let effects = InsertionEffects {
                    added_distance_km,
                    detour_ratio,
                    passengers_after: self.request_count + 1,
                    temporal_proximity_min: cost::temporal_proximity(
                        request.requested_pickup_at,
                        &existing_pickup_times,
                    ),
                    reuses_stop,
                };
                let score = cost::score(&config.weights, &effects);

                let improves = match &best {
                    None => true,
                    Some(current) => {
                        cost::compare(
                            score,
                            added_distance_km,
                            current.score,
                            current.added_distance_km,
                        )
                        .is_lt()
                    }
                };
                if improves {
                    best = Some(Insertion {
                        pickup_index,
                        dropoff_index,
                        score,
                        added_distance_km,
                        applied: simulated,
                    });
                }
            }
        }

        best
    }

    /// Applies a previously evaluated insertion to this plan.
    pub fn commit(&mut self, insertion: Insertion) {
        self.stops = insertion.applied.stops;
        self.total_distance_km = insertion.applied.total_distance_km;
        self.total_duration_min = insertion.applied.total_duration_min;
        self.request_count += 1;
    }

    /// Recomputes the schedule of a candidate sequence, returning `None`
    /// when capacity, trip-duration, waiting-time, or the waypoint ceiling
    /// would be violated.
    fn simulate(
        &self,
        mut stops: Vec<PlannedStop>,
        legs: &dyn LegSource,
        config: &PlannerConfig,
    ) -> Option<SimulatedPlan> {
        if stops.len() > MAX_ROUTE_STOPS {
            return None;
        }
        if stops.is_empty() {
            return Some(SimulatedPlan {
                stops,
                total_distance_km: 0.0,
                total_duration_min: 0.0,
            });
        }

        // Capacity over every prefix.
        let mut on_board: i64 = 0;
        for stop in &stops {
            match stop.kind {
                StopKind::Pickup => on_board += 1,
                StopKind::Dropoff => on_board -= 1,
            }
            if on_board > i64::from(self.vehicle.capacity) {
                return None;
            }
        }

        // The vehicle is timed to reach the first stop at its requested
        // pickup time; later pickups wait for their passenger if early.
        let first_leg = legs.leg(self.vehicle.coords(), stops[0].coords);
        let mut total_distance_km = first_leg.distance_km;
        let mut cursor = stops[0].requested_pickup_at;
        stops[0].eta = cursor;

        for i in 1..stops.len() {
            let leg = legs.leg(stops[i - 1].coords, stops[i].coords);
            total_distance_km += leg.distance_km;
            cursor += minutes_to_duration(leg.duration_min);
            if stops[i].kind == StopKind::Pickup && cursor < stops[i].requested_pickup_at {
                cursor = stops[i].requested_pickup_at;
            }
            stops[i].eta = cursor;
        }

        // Per-passenger trip duration.
        let max_trip = Duration::minutes(config.max_trip_duration_minutes);
        for stop in &stops {
            if stop.kind != StopKind::Dropoff {
                continue;
            }
            let pickup_eta = stops
                .iter()
                .find(|other| {
                    other.kind == StopKind::Pickup && other.request_id == stop.request_id
                })?
                .eta;
            if stop.eta - pickup_eta > max_trip {
                return None;
            }
        }

        // Waiting span across the vehicle's pickups, over both the ETAs and
        // the requested times. The ETA anchor follows the sequence order, so
        // the requested-time span is what keeps an early request from being
        // scheduled against a much later one.
        let max_wait = Duration::minutes(config.max_waiting_minutes);
        let pickups: Vec<&PlannedStop> = stops
            .iter()
            .filter(|stop| stop.kind == StopKind::Pickup)
            .collect();
        if let (Some(first), Some(last)) = (
            pickups.iter().map(|stop| stop.eta).min(),
            pickups.iter().map(|stop| stop.eta).max(),
        ) {
            if last - first > max_wait {
                return None;
            }
        }
        if let (Some(first), Some(last)) = (
            pickups.iter().map(|stop| stop.requested_pickup_at).min(),
            pickups.iter().map(|stop| stop.requested_pickup_at).max(),
        ) {
            if last - first > max_wait {
                return None;
            }
        }

        let span = stops[stops.len() - 1].eta - stops[0].eta;
        let total_duration_min = first_leg.duration_min + span.num_seconds() as f64 / 60.0;

        Some(SimulatedPlan {
            stops,
            total_distance_km,
            total_duration_min,
        })
    }

    /// Finalizes the plan into a published route with metrics and geometry.
    pub fn into_route(self, legs: &dyn LegSource, config: &PlannerConfig) -> VehicleRoute {
        let mut geometry = Polyline::default();
        let mut prev = self.vehicle.coords();
        for stop in &self.stops {
            geometry.append_leg(&legs.leg(prev, stop.coords).geometry);
            prev = stop.coords;
        }

        let stops = self
            .stops
            .into_iter()
            .enumerate()
            .map(|(sequence_index, stop)| RouteStop {
                stop_id: stop.stop_id,
                kind: stop.kind,
                request_id: stop.request_id,
                eta: stop.eta,
                sequence_index,
            })
            .collect();

        let metrics = impact::metrics(self.total_distance_km, self.request_count, &config.impact);

        VehicleRoute {
            vehicle_id: self.vehicle.id,
            stops,
            total_distance_km: self.total_distance_km,
            total_duration_min: self.total_duration_min,
            passenger_count: self.request_count,
            fuel_liters: metrics.fuel_liters,
            co2_kg: metrics.co2_kg,
            geometry,
        }
    }
}

fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::milliseconds((minutes * 60_000.0).round() as i64)
}
