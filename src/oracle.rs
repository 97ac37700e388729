//! Degradation policy around the routing oracle.
//!
//! Every leg lookup is retried once on failure, then replaced by a
//! straight-line haversine estimate so a flaky routing service degrades a
//! single leg instead of aborting the run. Resolved legs are cached for the
//! duration of a run since the insertion scan asks for the same pairs many
//! times.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

use crate::haversine::HaversineEstimator;
use crate::traits::{GeoOracle, LegSource, RouteLeg};

/// Wraps a [`GeoOracle`] with bounded retry, haversine fallback, and a
/// per-run leg cache.
pub struct ResilientOracle<O> {
    inner: O,
    fallback: HaversineEstimator,
    cache: Mutex<HashMap<(String, String), RouteLeg>>,
}

impl<O: GeoOracle> ResilientOracle<O> {
    pub fn new(inner: O) -> Self {
        Self::with_fallback(inner, HaversineEstimator::default())
    }

    pub fn with_fallback(inner: O, fallback: HaversineEstimator) -> Self {
        Self {
            inner,
            fallback,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Drops cached legs. Called between runs so a recovered oracle is
    /// consulted again instead of serving stale estimates.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("leg cache poisoned").clear();
    }

    fn resolve(&self, from: (f64, f64), to: (f64, f64)) -> RouteLeg {
        match self.inner.route(from, to).or_else(|_| self.inner.route(from, to)) {
            Ok(leg) => leg,
            Err(err) => {
                warn!(
                    from = ?from,
                    to = ?to,
                    error = %err,
                    "routing lookup failed after retry, using haversine estimate",
                );
                self.fallback.estimate(from, to)
            }
        }
    }
}

impl<O: GeoOracle + Sync> LegSource for ResilientOracle<O> {
    fn leg(&self, from: (f64, f64), to: (f64, f64)) -> RouteLeg {
        let key = (coord_key(from), coord_key(to));
        if let Some(leg) = self.cache.lock().expect("leg cache poisoned").get(&key) {
            return leg.clone();
        }

        let leg = self.resolve(from, to);
        self.cache
            .lock()
            .expect("leg cache poisoned")
            .insert(key, leg.clone());
        leg
    }
}

fn coord_key(coord: (f64, f64)) -> String {
    format!("{:.6},{:.6}", coord.0, coord.1)
}
