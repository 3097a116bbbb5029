//! Pluggable seams of the planner.
//!
//! Both are kept minimal so callers can swap the airport source or the
//! candidate trimming policy without touching the optimizer loop.

use crate::airports::Airport;
use crate::model::CandidatePlace;

/// Looks up the nearest airport that can take a scheduled flight.
pub trait AirportDirectory {
    /// Nearest qualifying airport to (lat, lng), if the source knows one.
    fn nearest(&self, location: (f64, f64)) -> Option<Airport>;
}

impl<T: AirportDirectory + ?Sized> AirportDirectory for &T {
    fn nearest(&self, location: (f64, f64)) -> Option<Airport> {
        (**self).nearest(location)
    }
}

impl<T: AirportDirectory + ?Sized> AirportDirectory for Box<T> {
    fn nearest(&self, location: (f64, f64)) -> Option<Airport> {
        (**self).nearest(location)
    }
}

/// Decides which candidates survive after an iteration overflowed the trip.
pub trait TrimStrategy {
    /// Returns the reduced candidate set. System places must be kept.
    ///
    /// Returning the input unchanged means nothing more can be removed.
    fn trim(&self, candidates: &[CandidatePlace]) -> Vec<CandidatePlace>;
}
