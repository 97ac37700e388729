//! OSRM HTTP adapter for single-leg routing lookups.

use serde::Deserialize;

use crate::error::OracleError;
use crate::polyline::Polyline;
use crate::traits::{GeoOracle, RouteLeg};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmOracle {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmOracle {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl GeoOracle for OsrmOracle {
    fn route(&self, from: (f64, f64), to: (f64, f64)) -> Result<RouteLeg, OracleError> {
        // OSRM takes lon,lat pairs.
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
            self.config.base_url, self.config.profile, from.1, from.0, to.1, to.0
        );

        let body: OsrmRouteResponse = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .json()?;

        if body.code != "Ok" {
            return Err(OracleError::Status(body.code));
        }

        let route = body.routes.into_iter().next().ok_or(OracleError::NoRoute)?;
        let points = route
            .geometry
            .map(|geometry| {
                geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| (lat, lon))
                    .collect()
            })
            .unwrap_or_default();

        Ok(RouteLeg {
            distance_km: route.distance / 1000.0,
            duration_min: route.duration / 60.0,
            geometry: Polyline::new(points),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}
