//! Fleet assignment: cheapest insertion across the whole fleet.
//!
//! Each round evaluates every (vehicle, unassigned request) pair through the
//! route builder, commits the single globally cheapest feasible insertion,
//! and rejects requests no vehicle can take. Candidate evaluation runs in
//! parallel per request; the selection fold is sequential with fixed
//! tie-breaks (score, added distance, vehicle id, request id), so the
//! outcome never depends on completion order.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::cost;
use crate::error::{RejectReason, RejectedRequest};
use crate::model::{Request, RequestId, Stop, StopId, Vehicle, VehicleId};
use crate::route::{Insertion, RoutePlan};
use crate::traits::LegSource;

/// Result of distributing one run's requests across the fleet.
#[derive(Debug)]
pub struct FleetPlan {
    /// One plan per vehicle, ordered by vehicle id ascending. Vehicles with
    /// no assignments keep an empty plan.
    pub plans: Vec<RoutePlan>,
    /// Committed (request, vehicle) pairs in commit order.
    pub assigned: Vec<(RequestId, VehicleId)>,
    pub rejected: Vec<RejectedRequest>,
}

/// Distributes `requests` across `vehicles` by repeated cheapest insertion.
pub fn assign<L: LegSource>(
    requests: &[Request],
    vehicles: &[Vehicle],
    stops: &HashMap<StopId, Stop>,
    legs: &L,
    config: &PlannerConfig,
) -> FleetPlan {
    let mut plans: Vec<RoutePlan> = {
        let mut vehicles: Vec<Vehicle> = vehicles.to_vec();
        vehicles.sort_by(|a, b| a.id.cmp(&b.id));
        vehicles.into_iter().map(RoutePlan::new).collect()
    };

    let mut assigned = Vec::new();
    let mut rejected = Vec::new();

    // Requests referencing unknown stops are rejected up front; the run
    // continues for the rest.
    let mut pending: Vec<&Request> = Vec::new();
    for request in requests {
        let missing = [&request.origin_stop_id, &request.dest_stop_id]
            .into_iter()
            .find(|id| !stops.contains_key(*id));
        if let Some(stop_id) = missing {
            rejected.push(RejectedRequest {
                request_id: request.id.clone(),
                reason: RejectReason::UnknownStop(stop_id.clone()),
            });
        } else {
            pending.push(request);
        }
    }
    pending.sort_by(|a, b| a.id.cmp(&b.id));

    while !pending.is_empty() {
        // Best feasible insertion per request across all vehicles. Plans are
        // ordered by vehicle id, so a strict improvement check makes the
        // lowest vehicle id win cost ties.
        let candidates: Vec<Option<(usize, Insertion)>> = pending
            .par_iter()
            .map(|request| {
                let origin = &stops[&request.origin_stop_id];
                let dest = &stops[&request.dest_stop_id];

                let mut best: Option<(usize, Insertion)> = None;
                for (plan_index, plan) in plans.iter().enumerate() {
                    let Some(insertion) =
                        plan.best_insertion(request, origin, dest, legs, config)
                    else {
                        continue;
                    };
                    let improves = match &best {
                        None => true,
                        Some((_, current)) => cost::compare(
                            insertion.score,
                            insertion.added_distance_km,
                            current.score,
                            current.added_distance_km,
                        )
                        .is_lt(),
                    };
                    if improves {
                        best = Some((plan_index, insertion));
                    }
                }
                best
            })
            .collect();

        // Requests every vehicle refused are rejected this round.
        let mut next_pending = Vec::with_capacity(pending.len());
        let mut round: Vec<(&Request, usize, Insertion)> = Vec::new();
        for (request, candidate) in pending.iter().zip(candidates) {
            match candidate {
                Some((plan_index, insertion)) => {
                    round.push((request, plan_index, insertion));
                    next_pending.push(*request);
                }
                None => {
                    debug!(request_id = %request.id, "no feasible vehicle, rejecting");
                    rejected.push(RejectedRequest {
                        request_id: request.id.clone(),
                        reason: RejectReason::NoFeasibleVehicle,
                    });
                }
            }
        }

        // Commit the globally cheapest pair. Requests are ordered by id, so
        // strict improvement makes the lowest request id win full ties.
        let Some((request, plan_index, insertion)) =
            round.into_iter().reduce(|best, candidate| {
                if cost::compare(
                    candidate.2.score,
                    candidate.2.added_distance_km,
                    best.2.score,
                    best.2.added_distance_km,
                )
                .is_lt()
                {
                    candidate
                } else {
                    best
                }
            })
        else {
            break;
        };

        debug!(
            request_id = %request.id,
            vehicle_id = %plans[plan_index].vehicle().id,
            score = insertion.score,
            added_km = insertion.added_distance_km,
            "committing cheapest insertion",
        );
        plans[plan_index].commit(insertion);
        assigned.push((request.id.clone(), plans[plan_index].vehicle().id.clone()));

        let committed = request.id.clone();
        pending = next_pending;
        pending.retain(|request| request.id != committed);
    }

    info!(
        assigned = assigned.len(),
        rejected = rejected.len(),
        "fleet assignment complete",
    );

    FleetPlan {
        plans,
        assigned,
        rejected,
    }
}
