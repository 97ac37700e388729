//! Seams to the external collaborators.
//!
//! The planner core never talks to a network or a database directly: it
//! reads and writes through [`PlanStore`], and resolves road legs through
//! [`GeoOracle`] (fallible, external) or [`LegSource`] (total, the view the
//! solver sees after the degradation policy has been applied). Tests inject
//! fakes for all three.

use crate::error::{OracleError, StoreError};
use crate::model::{Request, RequestId, RequestStatus, Stop, Vehicle, VehicleId, VehicleRoute};
use crate::polyline::Polyline;

/// One road leg between two coordinates, as returned by the routing oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub distance_km: f64,
    pub duration_min: f64,
    pub geometry: Polyline,
}

/// External routing service: road distance and travel time between two
/// (latitude, longitude) coordinates. May fail or rate-limit.
pub trait GeoOracle {
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<RouteLeg, OracleError>;
}

/// A leg lookup that always answers.
///
/// Implementations wrap a [`GeoOracle`] with the retry-then-estimate policy
/// (see [`crate::oracle::ResilientOracle`]) or synthesize legs directly in
/// tests. Must be shareable across the solver's parallel candidate scan.
pub trait LegSource: Sync {
    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> RouteLeg;
}

/// External key-value store holding stops, vehicles, and requests.
pub trait PlanStore {
    fn load_stops(&self) -> Result<Vec<Stop>, StoreError>;
    fn load_vehicles(&self) -> Result<Vec<Vehicle>, StoreError>;
    fn load_requests(&self) -> Result<Vec<Request>, StoreError>;

    /// Records the outcome of a run for one request.
    fn save_assignment(
        &mut self,
        request_id: &RequestId,
        vehicle_id: Option<&VehicleId>,
        status: RequestStatus,
    ) -> Result<(), StoreError>;

    /// Persists a finalized per-vehicle route.
    fn save_route(&mut self, route: &VehicleRoute) -> Result<(), StoreError>;
}
