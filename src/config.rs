//! Planner and airport dataset configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::haversine::TravelModel;

/// Open airport dataset published by OurAirports.
pub const DEFAULT_AIRPORTS_URL: &str =
    "https://davidmegginson.github.io/ourairports-data/airports.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Clock value (minutes from midnight) at which every day starts.
    pub day_start_minutes: u32,
    /// Touring cutoff; nothing new starts after this.
    pub day_end_minutes: u32,
    /// Hard clamp for emitted times (23:59).
    pub latest_minutes: u32,
    /// Travel plus visit minutes allowed per day outside flight days.
    pub daily_cap_minutes: u32,
    /// Selection budget per available day.
    pub places_per_day: usize,
    pub max_iterations: usize,
    /// One iteration is granted per this many user wishes.
    pub places_per_iteration: usize,
    /// Share of user wishes discarded after an iteration that does not fit.
    pub trim_fraction: f64,
    pub time_budget_secs: u64,
    pub airport_stay_minutes: u32,
    /// Validation limit for a single leg.
    pub max_leg_minutes: u32,
    /// Validation limit for travel within one day.
    pub max_day_travel_minutes: u32,
    pub max_flight_day_fraction: f64,
    pub travel: TravelModel,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            day_start_minutes: 8 * 60,
            day_end_minutes: 20 * 60,
            latest_minutes: 23 * 60 + 59,
            daily_cap_minutes: 10 * 60,
            places_per_day: 6,
            max_iterations: 10,
            places_per_iteration: 5,
            trim_fraction: 0.3,
            time_budget_secs: 50,
            airport_stay_minutes: 90,
            max_leg_minutes: 12 * 60,
            max_day_travel_minutes: 12 * 60,
            max_flight_day_fraction: 0.5,
            travel: TravelModel::default(),
        }
    }
}

impl PlannerConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_secs(self.time_budget_secs)
    }
}

#[derive(Debug, Clone)]
pub struct AirportDatasetConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for AirportDatasetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_AIRPORTS_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"places_per_day": 4, "travel": {"car_speed_kmh": 50.0}}"#)
                .unwrap();
        assert_eq!(config.places_per_day, 4);
        assert_eq!(config.daily_cap_minutes, 600);
        assert_eq!(config.travel.car_speed_kmh, 50.0);
        assert_eq!(config.travel.walking_speed_kmh, 5.0);
    }
}
