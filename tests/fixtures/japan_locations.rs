//! Real Japanese locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use trip_planner::model::{CandidatePlace, PlaceRole};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn wish(&self, id: &str, submitter: &str, stay: u32, desirability: f64) -> CandidatePlace {
        CandidatePlace::wish(id, self.name, self.coords(), submitter, stay, desirability)
    }

    pub fn departure(&self) -> CandidatePlace {
        CandidatePlace::system("departure", self.name, self.coords(), PlaceRole::DepartureAnchor, 0)
    }

    pub fn destination(&self) -> CandidatePlace {
        CandidatePlace::system(
            "destination",
            self.name,
            self.coords(),
            PlaceRole::DestinationAnchor,
            0,
        )
    }
}

// ============================================================================
// Central Tokyo (all within 5 km of Tokyo Station)
// ============================================================================

pub const TOKYO_STATION: Location = Location::new("Tokyo Station", 35.681, 139.767);

pub const TOKYO_CENTRAL: &[Location] = &[
    Location::new("Imperial Palace East Gardens", 35.6852, 139.7528),
    Location::new("Nihonbashi", 35.6840, 139.7745),
    Location::new("Ginza 4-chome", 35.6717, 139.7650),
    Location::new("Akihabara Electric Town", 35.6984, 139.7731),
    Location::new("Tokyo Tower", 35.6586, 139.7454),
    Location::new("Kanda Myojin", 35.7020, 139.7680),
    Location::new("Tsukiji Outer Market", 35.6654, 139.7707),
    Location::new("Hibiya Park", 35.6738, 139.7560),
];

pub const UENO_STATION: Location = Location::new("Ueno Station", 35.7138, 139.7773);

// ============================================================================
// Long-haul destinations
// ============================================================================

/// Just over the car limit from Tokyo, though Haneda and Kansai are closer.
pub const OKAYAMA_CASTLE: Location = Location::new("Okayama Castle", 34.6653, 133.9360);
pub const OHORI_PARK: Location = Location::new("Ohori Park", 33.5860, 130.3766);
pub const HAKATA_STATION: Location = Location::new("Hakata Station", 33.5897, 130.4207);
pub const ODORI_PARK: Location = Location::new("Odori Park", 43.0605, 141.3545);
