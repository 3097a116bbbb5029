//! Anchored nearest-neighbor route ordering and leg computation.

use tracing::debug;

use crate::error::{Error, Result};
use crate::haversine::{TravelModel, haversine_km};
use crate::model::{CandidatePlace, PlaceRole, TransportMode, TravelSegment};

/// Coordinates closer than this to (0, 0) are treated as unset.
const UNSET_COORDINATE_EPSILON: f64 = 1e-4;

const ROUND_TRIP_MARKERS: &[&str] = &["round trip", "round-trip", "roundtrip", "return to"];

/// True when the destination stands for "go back where we started".
///
/// Missing coordinates are ingested as (0, 0), so a real destination in
/// the Gulf of Guinea would be misread as a round trip.
pub fn is_round_trip_destination(destination: &CandidatePlace) -> bool {
    let (lat, lng) = destination.location();
    let unset = lat.abs() < UNSET_COORDINATE_EPSILON && lng.abs() < UNSET_COORDINATE_EPSILON;
    let name = destination.name.to_lowercase();
    unset || ROUND_TRIP_MARKERS.iter().any(|marker| name.contains(marker))
}

fn return_to(departure: &CandidatePlace, destination: &CandidatePlace) -> CandidatePlace {
    let mut place = departure.clone();
    place.id = format!("{}-return", departure.id);
    place.name = format!("Return to {}", departure.name);
    place.role = PlaceRole::DestinationAnchor;
    place.stay_minutes = destination.stay_minutes;
    place.persistent = false;
    place
}

/// Orders places: departure, greedy nearest neighbors, destination.
///
/// Without a departure anchor the first remaining place starts the route.
/// Distance ties go to the place listed first in `places`.
pub fn sequence(places: &[CandidatePlace]) -> Result<Vec<CandidatePlace>> {
    let departure_idx = places
        .iter()
        .position(|place| place.role == PlaceRole::DepartureAnchor);
    let destination_idx = places
        .iter()
        .position(|place| place.role == PlaceRole::DestinationAnchor);
    let departure = departure_idx.map(|idx| &places[idx]);
    let destination = destination_idx.map(|idx| &places[idx]);

    let mut others: Vec<&CandidatePlace> = places
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != departure_idx && Some(*idx) != destination_idx)
        .map(|(_, place)| place)
        .collect();

    let mut route: Vec<CandidatePlace> = Vec::with_capacity(places.len() + 1);
    match departure {
        Some(departure) => route.push(departure.clone()),
        None if !others.is_empty() => route.push(others.remove(0).clone()),
        None => {}
    }

    while !others.is_empty() {
        let tail = route
            .last()
            .map(CandidatePlace::location)
            .unwrap_or_else(|| others[0].location());
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (idx, place) in others.iter().enumerate() {
            let distance = haversine_km(tail, place.location());
            if distance < best_distance {
                best = idx;
                best_distance = distance;
            }
        }
        route.push(others.remove(best).clone());
    }

    if let Some(destination) = destination {
        if is_round_trip_destination(destination) {
            let departure = departure.ok_or_else(|| {
                Error::no_anchor(format!(
                    "destination '{}' is a round trip but no departure exists",
                    destination.name
                ))
            })?;
            debug!(departure = %departure.name, "destination resolved as round trip");
            route.push(return_to(departure, destination));
        } else {
            route.push(destination.clone());
        }
    }

    Ok(route)
}

/// One segment per consecutive pair; `legs[i]` arrives at `route[i + 1]`.
///
/// Generated airports only ever sit next to each other as the two ends of a
/// flight, so that leg is flown whatever its length.
pub fn compute_legs(route: &[CandidatePlace], travel: &TravelModel) -> Vec<TravelSegment> {
    route
        .windows(2)
        .map(|pair| {
            let distance_km = haversine_km(pair[0].location(), pair[1].location());
            let transport_mode = if pair
                .iter()
                .all(|place| place.role == PlaceRole::GeneratedAirport)
            {
                TransportMode::Flight
            } else {
                travel.transport_mode(distance_km)
            };
            TravelSegment {
                from_id: pair[0].id.clone(),
                to_id: pair[1].id.clone(),
                transport_mode,
                distance_km,
                travel_minutes: travel.travel_minutes(distance_km, transport_mode),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wish(id: &str, location: (f64, f64)) -> CandidatePlace {
        CandidatePlace::wish(id, id, location, "alice", 60, 3.0)
    }

    fn anchor(id: &str, name: &str, location: (f64, f64), role: PlaceRole) -> CandidatePlace {
        CandidatePlace::system(id, name, location, role, 0)
    }

    fn ids(route: &[CandidatePlace]) -> Vec<&str> {
        route.iter().map(|place| place.id.as_str()).collect()
    }

    #[test]
    fn test_anchors_pin_both_ends() {
        let places = vec![
            anchor("dst", "Shinagawa Station", (35.628, 139.739), PlaceRole::DestinationAnchor),
            wish("far", (35.700, 139.800)),
            wish("near", (35.685, 139.770)),
            anchor("dep", "Tokyo Station", (35.681, 139.767), PlaceRole::DepartureAnchor),
        ];
        let route = sequence(&places).unwrap();
        assert_eq!(ids(&route), vec!["dep", "near", "far", "dst"]);
    }

    #[test]
    fn test_without_departure_starts_with_first_other() {
        let places = vec![
            wish("a", (35.0, 139.0)),
            wish("c", (35.2, 139.0)),
            wish("b", (35.1, 139.0)),
        ];
        let route = sequence(&places).unwrap();
        assert_eq!(ids(&route), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_go_to_input_order() {
        let places = vec![
            anchor("dep", "Start", (35.0, 139.0), PlaceRole::DepartureAnchor),
            wish("north", (35.5, 139.0)),
            wish("south", (34.5, 139.0)),
        ];
        let route = sequence(&places).unwrap();
        assert_eq!(route[1].id, "north");
    }

    #[test]
    fn test_unset_destination_returns_to_departure() {
        let places = vec![
            anchor("dep", "Tokyo Station", (35.681, 139.767), PlaceRole::DepartureAnchor),
            wish("a", (35.685, 139.770)),
            anchor("dst", "Destination", (0.0, 0.0), PlaceRole::DestinationAnchor),
        ];
        let route = sequence(&places).unwrap();
        let last = route.last().unwrap();
        assert_eq!(last.id, "dep-return");
        assert_eq!(last.role, PlaceRole::DestinationAnchor);
        assert_eq!(last.location(), (35.681, 139.767));
        assert!(!last.persistent);
    }

    #[test]
    fn test_round_trip_by_name() {
        let places = vec![
            anchor("dep", "Hotel", (35.681, 139.767), PlaceRole::DepartureAnchor),
            anchor("dst", "Round trip", (35.0, 135.0), PlaceRole::DestinationAnchor),
        ];
        let route = sequence(&places).unwrap();
        assert_eq!(ids(&route), vec!["dep", "dep-return"]);
    }

    #[test]
    fn test_round_trip_without_departure_fails() {
        let places = vec![
            wish("a", (35.685, 139.770)),
            anchor("dst", "Destination", (0.0, 0.0), PlaceRole::DestinationAnchor),
        ];
        assert!(matches!(sequence(&places), Err(Error::NoDerivableAnchor(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(sequence(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_legs_follow_route() {
        let route = vec![
            wish("a", (35.681, 139.767)),
            wish("b", (35.685, 139.770)),
            wish("c", (35.443, 139.638)),
        ];
        let legs = compute_legs(&route, &TravelModel::default());
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].from_id, "a");
        assert_eq!(legs[0].to_id, "b");
        assert_eq!(legs[0].transport_mode, TransportMode::Walking);
        assert_eq!(legs[1].transport_mode, TransportMode::Car);
    }

    #[test]
    fn test_airport_pair_is_flown_even_within_car_range() {
        let airport = |id: &str, location| {
            CandidatePlace::system(id, id, location, PlaceRole::GeneratedAirport, 90)
        };
        // Haneda to Kansai is about 400 km.
        let route = vec![
            wish("tokyo", (35.681, 139.767)),
            airport("airport-HND-1", (35.5494, 139.7798)),
            airport("airport-KIX-2", (34.4347, 135.2440)),
            wish("okayama", (34.6653, 133.9360)),
        ];
        let legs = compute_legs(&route, &TravelModel::default());
        let modes: Vec<TransportMode> = legs.iter().map(|leg| leg.transport_mode).collect();
        assert_eq!(modes, vec![TransportMode::Car, TransportMode::Flight, TransportMode::Car]);
        assert!(legs[1].distance_km < 500.0);
    }
}
