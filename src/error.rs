//! Error kinds for the planner.
//!
//! Only two failures abort a run: an invalid constraint from the caller and
//! a store failure. Routing lookups degrade to an estimate instead of
//! failing, and per-request problems surface as [`RejectReason`] entries in
//! the run result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{RequestId, StopId};

/// Run-fatal planner errors.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures from the external key-value store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Failures from a single routing oracle lookup.
///
/// Never fatal to a run: the orchestrator retries once and then substitutes
/// a straight-line estimate for the failed leg.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service returned status {0}")]
    Status(String),
    #[error("routing service returned no route")]
    NoRoute,
}

/// Why a request was excluded from every route in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum RejectReason {
    /// No vehicle could satisfy capacity, waiting-time, duration, or
    /// waypoint constraints.
    NoFeasibleVehicle,
    /// The request references a stop id absent from the loaded stops.
    UnknownStop(StopId),
}

/// A rejected request together with the reason, surfaced in the run result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRequest {
    pub request_id: RequestId,
    pub reason: RejectReason,
}
