//! JSON request/response envelope around the optimizer.
//!
//! Records arrive from the persistence layer; this module validates them,
//! assigns each place its [`PlaceRole`] and turns the optimizer outcome into
//! `{success, optimization?, error?, execution_time_ms}`.

use std::collections::HashSet;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::model::{CandidatePlace, DaySchedule, PlaceRole, ScheduledPlace};
use crate::optimizer::{OptimizationResult, Optimizer, SearchState};
use crate::score::OptimizationScore;
use crate::traits::AirportDirectory;

const DEFAULT_STAY_MINUTES: u32 = 60;
const DEFAULT_DESIRABILITY: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputRole {
    #[serde(alias = "wish", alias = "userWish")]
    UserWish,
    #[serde(alias = "departure_anchor", alias = "departureAnchor")]
    Departure,
    #[serde(alias = "destination_anchor", alias = "destinationAnchor")]
    Destination,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub role: Option<InputRole>,
    #[serde(default, alias = "isDeparture")]
    pub is_departure: bool,
    #[serde(default, alias = "isDestination")]
    pub is_destination: bool,
    #[serde(default, alias = "submittedBy")]
    pub submitted_by: Option<String>,
    #[serde(default, alias = "desiredStayMinutes", alias = "stay_duration")]
    pub desired_stay_minutes: Option<u32>,
    #[serde(default, alias = "rawDesirability", alias = "wish_level")]
    pub raw_desirability: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    #[serde(default, alias = "tripId")]
    pub trip_id: String,
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    #[serde(alias = "endDate")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
    #[serde(default)]
    pub options: Option<PlannerConfig>,
}

impl TripRequest {
    /// Trip length in days, both ends inclusive.
    pub fn available_days(&self) -> Result<usize> {
        let span = (self.end_date - self.start_date).num_days();
        if span < 0 {
            return Err(Error::malformed(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(span as usize + 1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationPayload {
    pub daily_schedules: Vec<DaySchedule>,
    pub optimization_score: OptimizationScore,
    pub places: Vec<ScheduledPlace>,
    pub execution_time_ms: u64,
    pub iterations: usize,
    pub removed_places_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub state: SearchState,
    pub converged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
}

impl PlanResponse {
    fn failure(err: &Error, started: Instant) -> Self {
        Self {
            success: false,
            optimization: None,
            error: Some(err.to_string()),
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }
}

/// Validates the records and assigns roles. Fails on the first bad record.
pub fn ingest(records: &[PlaceRecord]) -> Result<Vec<CandidatePlace>> {
    let mut places = Vec::with_capacity(records.len());
    let mut ids = HashSet::new();
    let mut departures = 0;
    let mut destinations = 0;

    for (idx, record) in records.iter().enumerate() {
        let label = if record.id.is_empty() {
            format!("place #{}", idx)
        } else {
            format!("place '{}'", record.id)
        };
        if record.id.trim().is_empty() {
            return Err(Error::malformed(format!("{} has no id", label)));
        }
        if record.name.trim().is_empty() {
            return Err(Error::malformed(format!("{} has no name", label)));
        }
        if !ids.insert(record.id.as_str()) {
            return Err(Error::malformed(format!("{} is listed more than once", label)));
        }

        let role = match (record.role, record.is_departure, record.is_destination) {
            (Some(InputRole::Departure), _, _) | (None, true, false) => PlaceRole::DepartureAnchor,
            (Some(InputRole::Destination), _, _) | (None, false, true) => {
                PlaceRole::DestinationAnchor
            }
            (None, true, true) => {
                return Err(Error::malformed(format!(
                    "{} is flagged as both departure and destination",
                    label
                )));
            }
            (Some(InputRole::UserWish), _, _) | (None, false, false) => PlaceRole::UserWish,
        };
        match role {
            PlaceRole::DepartureAnchor => departures += 1,
            PlaceRole::DestinationAnchor => destinations += 1,
            _ => {}
        }

        let location = match (record.latitude, record.longitude) {
            (Some(lat), Some(lng)) => {
                if !valid_coordinates(lat, lng) {
                    return Err(Error::malformed(format!(
                        "{} has invalid coordinates ({}, {})",
                        label, lat, lng
                    )));
                }
                (lat, lng)
            }
            // Unset destination coordinates mean "back to the start".
            _ if role == PlaceRole::DestinationAnchor => (0.0, 0.0),
            _ => {
                return Err(Error::malformed(format!("{} is missing coordinates", label)));
            }
        };

        let stay_minutes = record.desired_stay_minutes.unwrap_or(match role {
            PlaceRole::UserWish => DEFAULT_STAY_MINUTES,
            _ => 0,
        });

        let mut place = if role == PlaceRole::UserWish {
            let submitter = record
                .submitted_by
                .as_deref()
                .map(str::trim)
                .filter(|submitter| !submitter.is_empty())
                .ok_or_else(|| Error::malformed(format!("{} has no submitter", label)))?;
            let desirability = record.raw_desirability.unwrap_or(DEFAULT_DESIRABILITY);
            if !(1.0..=5.0).contains(&desirability) {
                return Err(Error::malformed(format!(
                    "{} desirability {} is outside 1-5",
                    label, desirability
                )));
            }
            CandidatePlace::wish(
                record.id.clone(),
                record.name.clone(),
                location,
                submitter,
                stay_minutes,
                desirability,
            )
        } else {
            let mut place = CandidatePlace::system(
                record.id.clone(),
                record.name.clone(),
                location,
                role,
                stay_minutes,
            );
            if let Some(submitter) = &record.submitted_by {
                place.submitted_by = submitter.clone();
            }
            place
        };

        if let Some(category) = &record.category {
            place = place.with_category(category.clone());
        }
        if let Some(color) = &record.color {
            place = place.with_color(color.clone());
        }
        places.push(place);
    }

    if departures > 1 {
        return Err(Error::malformed(format!("{} departure anchors given", departures)));
    }
    if destinations > 1 {
        return Err(Error::malformed(format!("{} destination anchors given", destinations)));
    }
    if places.is_empty() {
        return Err(Error::no_anchor("trip has no places"));
    }

    Ok(places)
}

fn valid_coordinates(lat: f64, lng: f64) -> bool {
    lat.is_finite() && lng.is_finite() && lat.abs() <= 90.0 && lng.abs() <= 180.0
}

/// Runs the whole pipeline for one request and never fails outright:
/// errors come back as `success: false`.
pub fn plan_trip<D: AirportDirectory>(request: &TripRequest, directory: D) -> PlanResponse {
    let started = Instant::now();
    match run(request, directory) {
        Ok(result) => {
            let elapsed = started.elapsed().as_millis() as u64;
            info!(trip = %request.trip_id, elapsed_ms = elapsed, "trip planned");
            PlanResponse {
                success: true,
                optimization: Some(payload(result, elapsed)),
                error: None,
                execution_time_ms: elapsed,
            }
        }
        Err(err) => {
            error!(trip = %request.trip_id, error = %err, "trip planning failed");
            PlanResponse::failure(&err, started)
        }
    }
}

fn run<D: AirportDirectory>(request: &TripRequest, directory: D) -> Result<OptimizationResult> {
    if request.trip_id.trim().is_empty() {
        return Err(Error::MissingTrip);
    }
    let available_days = request.available_days()?;
    let places = ingest(&request.places)?;
    let config = request.options.clone().unwrap_or_default();

    Optimizer::new(directory, config).optimize(&places, request.start_date, available_days)
}

fn payload(result: OptimizationResult, execution_time_ms: u64) -> OptimizationPayload {
    let places = result
        .days
        .iter()
        .flat_map(|day| day.places.iter().cloned())
        .collect();
    let converged = result.converged();

    OptimizationPayload {
        daily_schedules: result.days,
        optimization_score: result.score,
        places,
        execution_time_ms,
        iterations: result.iterations,
        removed_places_count: result.removed_places_count,
        warning: result.warning,
        state: result.state,
        converged,
    }
}
