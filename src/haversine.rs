//! Great-circle distance and transport-mode estimation.
//!
//! Travel times are rough: every leg is the straight-line distance at an
//! assumed speed plus a fixed overhead for the chosen mode.

use serde::{Deserialize, Serialize};

use crate::model::TransportMode;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two (lat, lng) points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Speed and overhead assumptions per transport mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelModel {
    /// Legs up to this distance are walked.
    pub walking_max_km: f64,
    /// Legs up to this distance are driven; anything longer is flown.
    pub car_max_km: f64,
    pub walking_speed_kmh: f64,
    pub walking_overhead_minutes: f64,
    pub car_speed_kmh: f64,
    pub car_overhead_minutes: f64,
    pub flight_speed_kmh: f64,
    /// Check-in and transfer time for a regular flight.
    pub flight_overhead_minutes: f64,
    /// Overhead for flights longer than `long_haul_km`.
    pub long_haul_overhead_minutes: f64,
    pub long_haul_km: f64,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            walking_max_km: 2.0,
            car_max_km: 500.0,
            walking_speed_kmh: 5.0,
            walking_overhead_minutes: 5.0,
            car_speed_kmh: 60.0,
            car_overhead_minutes: 10.0,
            flight_speed_kmh: 700.0,
            flight_overhead_minutes: 60.0,
            long_haul_overhead_minutes: 90.0,
            long_haul_km: 3000.0,
        }
    }
}

impl TravelModel {
    pub fn transport_mode(&self, distance_km: f64) -> TransportMode {
        if distance_km <= self.walking_max_km {
            TransportMode::Walking
        } else if distance_km <= self.car_max_km {
            TransportMode::Car
        } else {
            TransportMode::Flight
        }
    }

    /// Estimated door-to-door minutes for a leg, rounded to whole minutes.
    pub fn travel_minutes(&self, distance_km: f64, mode: TransportMode) -> u32 {
        let minutes = match mode {
            TransportMode::Walking => {
                distance_km / self.walking_speed_kmh * 60.0 + self.walking_overhead_minutes
            }
            TransportMode::Car => distance_km / self.car_speed_kmh * 60.0 + self.car_overhead_minutes,
            TransportMode::Flight => {
                let overhead = if distance_km > self.long_haul_km {
                    self.long_haul_overhead_minutes
                } else {
                    self.flight_overhead_minutes
                };
                distance_km / self.flight_speed_kmh * 60.0 + overhead
            }
        };
        minutes.round() as u32
    }
}
