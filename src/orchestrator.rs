//! Run orchestration: load, filter, assign, summarize, persist.
//!
//! [`Optimizer::plan`] is pure compute over a snapshot of the store;
//! [`Optimizer::commit`] persists a computed outcome. [`RunCoordinator`]
//! serializes runs: at most one executes at a time, triggers arriving
//! mid-run coalesce into a single pending re-run, and a run superseded by a
//! newer trigger is discarded before anything is committed or published.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{PlannerConfig, TimeWindow};
use crate::error::{PlanError, RejectedRequest};
use crate::impact;
use crate::model::{
    EnvironmentalMetrics, RequestId, RequestStatus, Stop, StopId, VehicleId, VehicleRoute,
};
use crate::solver;
use crate::traits::{LegSource, PlanStore};

/// Everything a run produces, handed to presentation and storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub window: TimeWindow,
    pub routes: Vec<VehicleRoute>,
    pub assigned: Vec<(RequestId, VehicleId)>,
    pub rejected: Vec<RejectedRequest>,
    pub summary: EnvironmentalMetrics,
}

/// One optimization pipeline bound to a store and a leg source.
pub struct Optimizer<S, L> {
    store: S,
    legs: L,
    config: PlannerConfig,
}

impl<S: PlanStore, L: LegSource> Optimizer<S, L> {
    pub fn new(store: S, legs: L, config: PlannerConfig) -> Result<Self, PlanError> {
        config.validate()?;
        Ok(Self {
            store,
            legs,
            config,
        })
    }

    /// Computes routes for the pending requests inside `window` without
    /// touching the store beyond reads.
    pub fn plan(&self, window: TimeWindow) -> Result<OptimizationOutcome, PlanError> {
        self.config.validate()?;
        let window = window.normalized();

        let stops: Vec<Stop> = self.store.load_stops()?;
        let vehicles = self.store.load_vehicles()?;
        let all_requests = self.store.load_requests()?;

        let requests: Vec<_> = all_requests
            .into_iter()
            .filter(|request| {
                request.status == RequestStatus::Pending
                    && window.contains(request.requested_pickup_at)
            })
            .collect();
        info!(
            requests = requests.len(),
            vehicles = vehicles.len(),
            stops = stops.len(),
            window_start = %window.start,
            window_end = %window.end,
            "optimization run starting",
        );

        let stop_index: HashMap<StopId, Stop> = stops
            .into_iter()
            .map(|stop| (stop.id.clone(), stop))
            .collect();

        let fleet = solver::assign(&requests, &vehicles, &stop_index, &self.legs, &self.config);

        let routes: Vec<VehicleRoute> = fleet
            .plans
            .into_iter()
            .filter(|plan| !plan.is_empty())
            .map(|plan| plan.into_route(&self.legs, &self.config))
            .collect();
        let summary = impact::fleet_summary(&routes);

        Ok(OptimizationOutcome {
            window,
            routes,
            assigned: fleet.assigned,
            rejected: fleet.rejected,
            summary,
        })
    }

    /// Persists a computed outcome: request statuses, assignments, routes.
    pub fn commit(&mut self, outcome: &OptimizationOutcome) -> Result<(), PlanError> {
        for (request_id, vehicle_id) in &outcome.assigned {
            self.store
                .save_assignment(request_id, Some(vehicle_id), RequestStatus::Assigned)?;
        }
        for rejection in &outcome.rejected {
            self.store
                .save_assignment(&rejection.request_id, None, RequestStatus::Rejected)?;
        }
        for route in &outcome.routes {
            self.store.save_route(route)?;
        }
        Ok(())
    }

    /// Plan and commit in one step.
    pub fn run(&mut self, window: TimeWindow) -> Result<OptimizationOutcome, PlanError> {
        let outcome = self.plan(window)?;
        self.commit(&outcome)?;
        Ok(outcome)
    }
}

/// What a trigger call observed.
#[derive(Debug, Clone)]
pub enum TriggerOutcome {
    /// This caller executed the run(s) and this is the newest result.
    Completed(Arc<OptimizationOutcome>),
    /// Another run was in flight; this trigger was folded into its re-run.
    Coalesced,
}

struct CoordState {
    running: bool,
    pending: Option<TimeWindow>,
    generation: u64,
}

/// Serializes optimization runs over a shared [`Optimizer`].
pub struct RunCoordinator<S, L> {
    optimizer: Mutex<Optimizer<S, L>>,
    state: Mutex<CoordState>,
    published: RwLock<Option<Arc<OptimizationOutcome>>>,
}

impl<S: PlanStore, L: LegSource> RunCoordinator<S, L> {
    pub fn new(optimizer: Optimizer<S, L>) -> Self {
        Self {
            optimizer: Mutex::new(optimizer),
            state: Mutex::new(CoordState {
                running: false,
                pending: None,
                generation: 0,
            }),
            published: RwLock::new(None),
        }
    }

    /// The last committed outcome, as an atomically swapped snapshot.
    pub fn latest(&self) -> Option<Arc<OptimizationOutcome>> {
        self.published
            .read()
            .expect("published outcome poisoned")
            .clone()
    }

    /// Requests an optimization over `window`.
    ///
    /// If no run is in flight, this caller executes it (and any re-runs
    /// queued behind it) and returns the newest committed outcome. If a run
    /// is already executing, the window is recorded as the single pending
    /// re-run (latest trigger wins) and `Coalesced` is returned.
    pub fn trigger(&self, window: TimeWindow) -> Result<TriggerOutcome, PlanError> {
        {
            let mut state = self.state.lock().expect("coordinator state poisoned");
            state.generation += 1;
            state.pending = Some(window);
            if state.running {
                debug!("run in flight, coalescing trigger");
                return Ok(TriggerOutcome::Coalesced);
            }
            state.running = true;
        }

        let mut newest: Option<Arc<OptimizationOutcome>> = None;
        loop {
            let (window, generation) = {
                let mut state = self.state.lock().expect("coordinator state poisoned");
                match state.pending.take() {
                    Some(window) => (window, state.generation),
                    None => {
                        state.running = false;
                        break;
                    }
                }
            };

            let planned = {
                let optimizer = self.optimizer.lock().expect("optimizer poisoned");
                optimizer.plan(window)
            };
            let outcome = match planned {
                Ok(outcome) => outcome,
                Err(err) => {
                    let mut state = self.state.lock().expect("coordinator state poisoned");
                    state.running = false;
                    return Err(err);
                }
            };

            // Supersede check, commit, and publish are one critical section:
            // a cancelled run must never become visible, even partially.
            let mut state = self.state.lock().expect("coordinator state poisoned");
            if state.generation != generation {
                debug!("run superseded before commit, discarding");
                continue;
            }
            let committed = {
                let mut optimizer = self.optimizer.lock().expect("optimizer poisoned");
                optimizer.commit(&outcome)
            };
            if let Err(err) = committed {
                state.running = false;
                return Err(err);
            }
            let outcome = Arc::new(outcome);
            *self.published.write().expect("published outcome poisoned") =
                Some(Arc::clone(&outcome));
            newest = Some(outcome);
        }

        Ok(newest
            .map(TriggerOutcome::Completed)
            .unwrap_or(TriggerOutcome::Coalesced))
    }
}
