//! drt-planner: dynamic route assignment for demand-responsive transport.
//!
//! Partitions pending ride requests across a capacity-limited fleet and
//! orders each vehicle's pickups and dropoffs by cheapest insertion, under
//! waiting-time and trip-duration limits. External collaborators (request
//! store, routing oracle, presentation) plug in through the traits in
//! [`traits`].

pub mod config;
pub mod cost;
pub mod error;
pub mod haversine;
pub mod impact;
pub mod model;
pub mod oracle;
pub mod orchestrator;
pub mod osrm;
pub mod polyline;
pub mod route;
pub mod solver;
pub mod traits;
