//! Fuel and CO2 accounting for finalized routes.

use crate::config::ImpactFactors;
use crate::model::{EnvironmentalMetrics, VehicleRoute};

/// Derives fuel/CO2 figures from a route's total distance and occupancy.
pub fn metrics(
    total_distance_km: f64,
    passenger_count: u32,
    factors: &ImpactFactors,
) -> EnvironmentalMetrics {
    let fuel_liters = total_distance_km * factors.fuel_l_per_100km / 100.0;
    let co2_kg = fuel_liters * factors.co2_kg_per_liter;
    let divisor = f64::from(passenger_count.max(1));

    EnvironmentalMetrics {
        fuel_liters,
        co2_kg,
        per_passenger_fuel_liters: fuel_liters / divisor,
        per_passenger_co2_kg: co2_kg / divisor,
    }
}

/// Fleet-wide totals across all routes of a run; per-passenger figures are
/// recomputed over the total assigned passenger count.
pub fn fleet_summary(routes: &[VehicleRoute]) -> EnvironmentalMetrics {
    let fuel_liters: f64 = routes.iter().map(|route| route.fuel_liters).sum();
    let co2_kg: f64 = routes.iter().map(|route| route.co2_kg).sum();
    let passengers: u32 = routes.iter().map(|route| route.passenger_count).sum();
    let divisor = f64::from(passengers.max(1));

    EnvironmentalMetrics {
        fuel_liters,
        co2_kg,
        per_passenger_fuel_liters: fuel_liters / divisor,
        per_passenger_co2_kg: co2_kg / divisor,
    }
}
