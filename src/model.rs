//! Planner data model.
//!
//! A run works on its own clones of the candidate places; nothing derived
//! during optimization is written back to the caller's records.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Desirability scale upper bound; system places are pinned to it.
pub const MAX_DESIRABILITY: f64 = 5.0;

/// Submitter recorded on anchors and generated airports.
pub const SYSTEM_SUBMITTER: &str = "system";

/// Why a place is part of the trip. Assigned once at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceRole {
    UserWish,
    DepartureAnchor,
    DestinationAnchor,
    GeneratedAirport,
}

impl PlaceRole {
    /// Anchors and generated airports are never trimmed.
    pub fn is_system(self) -> bool {
        !matches!(self, PlaceRole::UserWish)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    Single,
    Gradient,
    Popular,
}

/// A trip member who asked for a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub submitter: String,
    pub color: Option<String>,
    pub desirability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePlace {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub submitted_by: String,
    pub stay_minutes: u32,
    pub raw_desirability: f64,
    pub normalized_desirability: f64,
    pub role: PlaceRole,
    pub contributors: Vec<Contributor>,
    pub color: Option<String>,
    pub color_type: ColorType,
    /// Fair-selection round in which the place was chosen.
    pub selection_round: Option<u32>,
    /// False for places synthesized during a run.
    pub persistent: bool,
}

impl CandidatePlace {
    /// A user wish with a single contributor (its own submitter).
    pub fn wish(
        id: impl Into<String>,
        name: impl Into<String>,
        location: (f64, f64),
        submitted_by: impl Into<String>,
        stay_minutes: u32,
        raw_desirability: f64,
    ) -> Self {
        let submitted_by = submitted_by.into();
        Self {
            id: id.into(),
            name: name.into(),
            latitude: location.0,
            longitude: location.1,
            category: String::new(),
            contributors: vec![Contributor {
                submitter: submitted_by.clone(),
                color: None,
                desirability: raw_desirability,
            }],
            submitted_by,
            stay_minutes,
            raw_desirability,
            normalized_desirability: raw_desirability,
            role: PlaceRole::UserWish,
            color: None,
            color_type: ColorType::Single,
            selection_round: None,
            persistent: true,
        }
    }

    /// An anchor or generated place owned by the system.
    pub fn system(
        id: impl Into<String>,
        name: impl Into<String>,
        location: (f64, f64),
        role: PlaceRole,
        stay_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: location.0,
            longitude: location.1,
            category: String::new(),
            submitted_by: SYSTEM_SUBMITTER.to_string(),
            stay_minutes,
            raw_desirability: MAX_DESIRABILITY,
            normalized_desirability: MAX_DESIRABILITY,
            role,
            contributors: Vec::new(),
            color: None,
            color_type: ColorType::Single,
            selection_round: None,
            persistent: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        for contributor in &mut self.contributors {
            if contributor.submitter == self.submitted_by {
                contributor.color = Some(color.clone());
            }
        }
        self.color = Some(color);
        self
    }

    /// Location coordinates (lat, lng).
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn is_system(&self) -> bool {
        self.role.is_system()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walking,
    Car,
    Flight,
}

/// A directed leg between two consecutive route places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelSegment {
    pub from_id: String,
    pub to_id: String,
    pub transport_mode: TransportMode,
    pub distance_km: f64,
    pub travel_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPlace {
    #[serde(flatten)]
    pub place: CandidatePlace,
    pub arrival_time: NaiveTime,
    pub departure_time: NaiveTime,
    pub order_in_day: u32,
    pub incoming_segment: Option<TravelSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// 1-based day number within the trip.
    pub day_index: u32,
    pub date: NaiveDate,
    pub places: Vec<ScheduledPlace>,
    pub total_travel_minutes: u32,
    pub total_visit_minutes: u32,
}

impl DaySchedule {
    pub fn total_minutes(&self) -> u32 {
        self.total_travel_minutes + self.total_visit_minutes
    }

    pub fn has_flight(&self) -> bool {
        self.places.iter().any(|scheduled| {
            scheduled
                .incoming_segment
                .as_ref()
                .is_some_and(|segment| segment.transport_mode == TransportMode::Flight)
        })
    }
}
