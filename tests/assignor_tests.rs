//! Fleet assignment behavior: pooling, rejection, invariants, determinism.

mod fixtures;

use std::collections::HashMap;

use drt_planner::config::PlannerConfig;
use drt_planner::error::RejectReason;
use drt_planner::haversine::HaversineEstimator;
use drt_planner::model::{RequestId, StopId, StopKind, VehicleId, VehicleRoute};
use drt_planner::solver::{assign, FleetPlan};

use fixtures::{at, leiria_stops, request, stop, stop_at, stop_index, vehicle, GridLegs};

fn routes_of(fleet: FleetPlan, config: &PlannerConfig) -> Vec<VehicleRoute> {
    fleet
        .plans
        .into_iter()
        .filter(|plan| !plan.is_empty())
        .map(|plan| plan.into_route(&GridLegs, config))
        .collect()
}

fn assert_route_invariants(route: &VehicleRoute, capacity: u32, config: &PlannerConfig) {
    // Pickup strictly before dropoff for every request.
    let mut pickup_index: HashMap<&RequestId, usize> = HashMap::new();
    for stop in &route.stops {
        if stop.kind == StopKind::Pickup {
            pickup_index.insert(&stop.request_id, stop.sequence_index);
        }
    }
    let mut pickup_etas = Vec::new();
    let mut on_board: i64 = 0;
    for stop in &route.stops {
        match stop.kind {
            StopKind::Pickup => {
                on_board += 1;
                pickup_etas.push(stop.eta);
            }
            StopKind::Dropoff => {
                on_board -= 1;
                let pickup = pickup_index
                    .get(&stop.request_id)
                    .expect("dropoff without pickup");
                assert!(
                    *pickup < stop.sequence_index,
                    "pickup must precede dropoff for {}",
                    stop.request_id
                );
                let pickup_eta = route
                    .stops
                    .iter()
                    .find(|s| s.kind == StopKind::Pickup && s.request_id == stop.request_id)
                    .unwrap()
                    .eta;
                let trip_min = (stop.eta - pickup_eta).num_minutes();
                assert!(
                    trip_min <= config.max_trip_duration_minutes,
                    "trip duration {}min exceeds limit",
                    trip_min
                );
            }
        }
        assert!(on_board >= 0);
        assert!(
            on_board <= i64::from(capacity),
            "capacity exceeded on prefix"
        );
    }

    if let (Some(first), Some(last)) = (pickup_etas.iter().min(), pickup_etas.iter().max()) {
        let span_min = (*last - *first).num_minutes();
        assert!(
            span_min <= config.max_waiting_minutes,
            "waiting span {}min exceeds limit",
            span_min
        );
    }
}

#[test]
fn shared_stop_requests_pool_onto_one_vehicle() {
    // Three requests over the same origin/destination pair within ten
    // minutes: stop reuse and time clustering must beat spreading them
    // across the idle second vehicle.
    let stops = vec![stop("s0", 0.0, 0.0), stop("s1", 2.0, 0.0)];
    let index = stop_index(&stops);
    let vehicles = vec![vehicle("veh-a", 4, 0.0, 0.0), vehicle("veh-b", 4, 0.0, 0.0)];
    let requests = vec![
        request("r1", "s0", "s1", at(8, 0)),
        request("r2", "s0", "s1", at(8, 5)),
        request("r3", "s0", "s1", at(8, 10)),
    ];
    let config = PlannerConfig::default();

    let fleet = assign(&requests, &vehicles, &index, &GridLegs, &config);

    assert!(fleet.rejected.is_empty());
    assert_eq!(fleet.assigned.len(), 3);
    let carriers: Vec<&VehicleId> = fleet.assigned.iter().map(|(_, v)| v).collect();
    assert!(
        carriers.iter().all(|v| **v == *carriers[0]),
        "all three requests should ride together, got {:?}",
        carriers
    );

    let routes = routes_of(fleet, &config);
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].passenger_count, 3);
    assert_route_invariants(&routes[0], 4, &config);
}

#[test]
fn pooling_holds_on_real_road_distances() {
    // Same scenario over real Leiria coordinates and haversine legs.
    let stops = vec![
        stop_at("castle", leiria_stops::CASTLE),
        stop_at("market", leiria_stops::MARKET),
    ];
    let index = stop_index(&stops);
    let vehicles = vec![
        vehicle("veh-a", 4, leiria_stops::CASTLE.0, leiria_stops::CASTLE.1),
        vehicle("veh-b", 4, leiria_stops::CASTLE.0, leiria_stops::CASTLE.1),
    ];
    let requests = vec![
        request("r1", "castle", "market", at(8, 0)),
        request("r2", "castle", "market", at(8, 5)),
        request("r3", "castle", "market", at(8, 10)),
    ];
    let config = PlannerConfig::default();
    let legs = HaversineEstimator::default();

    let fleet = assign(&requests, &vehicles, &index, &legs, &config);

    assert!(fleet.rejected.is_empty());
    let carriers: Vec<&VehicleId> = fleet.assigned.iter().map(|(_, v)| v).collect();
    assert!(carriers.iter().all(|v| **v == *carriers[0]));
}

#[test]
fn unsatisfiable_waiting_window_rejects_only_that_request() {
    // One vehicle; the second request sits an hour outside the first's
    // waiting window. It must be rejected while the first still rides.
    let stops = vec![stop("s0", 1.0, 0.0), stop("s1", 2.0, 0.0)];
    let index = stop_index(&stops);
    let vehicles = vec![vehicle("veh-a", 4, 0.0, 0.0)];
    let requests = vec![
        request("r1", "s0", "s1", at(8, 0)),
        request("r2", "s0", "s1", at(9, 0)),
    ];
    let config = PlannerConfig::default();

    let fleet = assign(&requests, &vehicles, &index, &GridLegs, &config);

    assert_eq!(fleet.assigned.len(), 1);
    assert_eq!(fleet.assigned[0].0, RequestId::new("r1"));
    assert_eq!(fleet.rejected.len(), 1);
    assert_eq!(fleet.rejected[0].request_id, RequestId::new("r2"));
    assert_eq!(fleet.rejected[0].reason, RejectReason::NoFeasibleVehicle);

    let routes = routes_of(fleet, &config);
    assert_eq!(routes.len(), 1);
    assert_route_invariants(&routes[0], 4, &config);
}

#[test]
fn fleet_wide_capacity_exhaustion_rejects_surplus() {
    let stops = vec![stop("s0", 1.0, 0.0), stop("s1", 2.0, 0.0)];
    let index = stop_index(&stops);
    let vehicles = vec![vehicle("veh-a", 4, 0.0, 0.0)];
    let requests = vec![
        request("r1", "s0", "s1", at(8, 0)),
        request("r2", "s0", "s1", at(8, 2)),
        request("r3", "s0", "s1", at(8, 4)),
    ];
    let config = PlannerConfig {
        max_requests_per_vehicle: 2,
        ..PlannerConfig::default()
    };

    let fleet = assign(&requests, &vehicles, &index, &GridLegs, &config);

    assert_eq!(fleet.assigned.len(), 2);
    assert_eq!(fleet.rejected.len(), 1);
    assert_eq!(fleet.rejected[0].reason, RejectReason::NoFeasibleVehicle);
}

#[test]
fn invariants_hold_across_a_mixed_instance() {
    let stops = vec![
        stop("s0", 0.0, 0.0),
        stop("s1", 1.0, 0.0),
        stop("s2", 2.0, 1.0),
        stop("s3", 0.0, 2.0),
    ];
    let index = stop_index(&stops);
    let vehicles = vec![vehicle("veh-a", 2, 0.0, 0.0), vehicle("veh-b", 2, 1.0, 1.0)];
    let requests = vec![
        request("r1", "s0", "s1", at(8, 0)),
        request("r2", "s1", "s2", at(8, 3)),
        request("r3", "s2", "s3", at(8, 6)),
        request("r4", "s0", "s2", at(8, 9)),
        request("r5", "s3", "s1", at(8, 12)),
        request("r6", "s1", "s0", at(8, 14)),
    ];
    let config = PlannerConfig::default();

    let fleet = assign(&requests, &vehicles, &index, &GridLegs, &config);

    let assigned = fleet.assigned.len();
    let rejected = fleet.rejected.len();
    assert_eq!(assigned + rejected, requests.len());

    for route in routes_of(fleet, &config) {
        assert_route_invariants(&route, 2, &config);
        // Two route stops per assigned request.
        assert_eq!(route.stops.len() as u32, route.passenger_count * 2);
    }
}

#[test]
fn assignment_is_idempotent() {
    let stops = vec![
        stop("s0", 0.0, 0.0),
        stop("s1", 1.0, 0.0),
        stop("s2", 2.0, 1.0),
    ];
    let index = stop_index(&stops);
    let vehicles = vec![vehicle("veh-a", 3, 0.0, 0.0), vehicle("veh-b", 3, 2.0, 0.0)];
    let requests = vec![
        request("r1", "s0", "s1", at(8, 0)),
        request("r2", "s1", "s2", at(8, 4)),
        request("r3", "s0", "s2", at(8, 8)),
        request("r4", "s2", "s0", at(8, 12)),
    ];
    let config = PlannerConfig::default();

    let first = assign(&requests, &vehicles, &index, &GridLegs, &config);
    let second = assign(&requests, &vehicles, &index, &GridLegs, &config);

    assert_eq!(first.assigned, second.assigned);
    assert_eq!(first.rejected, second.rejected);

    let first_routes = routes_of(first, &config);
    let second_routes = routes_of(second, &config);
    assert_eq!(first_routes.len(), second_routes.len());
    for (a, b) in first_routes.iter().zip(&second_routes) {
        assert_eq!(a.vehicle_id, b.vehicle_id);
        assert_eq!(a.total_distance_km, b.total_distance_km);
        let a_seq: Vec<_> = a.stops.iter().map(|s| (&s.request_id, s.kind)).collect();
        let b_seq: Vec<_> = b.stops.iter().map(|s| (&s.request_id, s.kind)).collect();
        assert_eq!(a_seq, b_seq);
    }
}

#[test]
fn vehicle_input_order_does_not_change_the_outcome() {
    let stops = vec![stop("s0", 1.0, 0.0), stop("s1", 2.0, 0.0)];
    let index = stop_index(&stops);
    let requests = vec![
        request("r1", "s0", "s1", at(8, 0)),
        request("r2", "s1", "s0", at(8, 5)),
    ];
    let config = PlannerConfig::default();

    let forward = vec![vehicle("veh-a", 4, 0.0, 0.0), vehicle("veh-b", 4, 3.0, 0.0)];
    let reversed: Vec<_> = forward.iter().rev().cloned().collect();

    let a = assign(&requests, &forward, &index, &GridLegs, &config);
    let b = assign(&requests, &reversed, &index, &GridLegs, &config);
    assert_eq!(a.assigned, b.assigned);
}

#[test]
fn unknown_stop_rejected_with_stop_id() {
    let stops = vec![stop("s0", 1.0, 0.0), stop("s1", 2.0, 0.0)];
    let index = stop_index(&stops);
    let vehicles = vec![vehicle("veh-a", 4, 0.0, 0.0)];
    let requests = vec![
        request("r1", "ghost", "s1", at(8, 0)),
        request("r2", "s0", "s1", at(8, 0)),
    ];
    let config = PlannerConfig::default();

    let fleet = assign(&requests, &vehicles, &index, &GridLegs, &config);

    assert_eq!(
        fleet.rejected,
        vec![drt_planner::error::RejectedRequest {
            request_id: RequestId::new("r1"),
            reason: RejectReason::UnknownStop(StopId::new("ghost")),
        }]
    );
    assert_eq!(fleet.assigned.len(), 1);
}
