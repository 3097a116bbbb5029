//! End-to-end planner tests
//!
//! Realistic group trips through dedup, selection, sequencing, airport
//! insertion, scheduling and scoring.

mod fixtures;

use chrono::NaiveDate;

use trip_planner::airports::FixedAirportTable;
use trip_planner::api::{TripRequest, plan_trip};
use trip_planner::config::PlannerConfig;
use trip_planner::model::{CandidatePlace, PlaceRole, TransportMode};
use trip_planner::optimizer::{OptimizationResult, Optimizer, SearchState};
use trip_planner::preference::normalize;
use trip_planner::selector::select;

use fixtures::*;

// ============================================================================
// Test Infrastructure
// ============================================================================

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
}

fn optimizer() -> Optimizer<FixedAirportTable> {
    Optimizer::new(FixedAirportTable::default(), PlannerConfig::default())
}

fn route_ids(result: &OptimizationResult) -> Vec<&str> {
    result.route.iter().map(|place| place.id.as_str()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn tokyo_walking_trip_fits_two_days() {
    let json = r#"{
        "trip_id": "tokyo-weekend",
        "start_date": "2025-04-01",
        "end_date": "2025-04-02",
        "options": {"places_per_day": 4},
        "places": [
            {"id": "dep", "name": "Tokyo Station", "latitude": 35.681, "longitude": 139.767,
             "role": "departure"},
            {"id": "palace", "name": "Imperial Palace East Gardens", "latitude": 35.6852,
             "longitude": 139.7528, "submitted_by": "alice", "desired_stay_minutes": 90,
             "raw_desirability": 4},
            {"id": "nihonbashi", "name": "Nihonbashi", "latitude": 35.6840, "longitude": 139.7745,
             "submitted_by": "bob", "desired_stay_minutes": 60, "raw_desirability": 3},
            {"id": "ginza", "name": "Ginza 4-chome", "latitude": 35.6717, "longitude": 139.7650,
             "submitted_by": "alice", "desired_stay_minutes": 120, "raw_desirability": 5},
            {"id": "dst", "name": "Ueno Station", "latitude": 35.7138, "longitude": 139.7773,
             "role": "destination"}
        ]
    }"#;
    let request: TripRequest = serde_json::from_str(json).unwrap();
    let response = plan_trip(&request, FixedAirportTable::default());

    assert!(response.success, "error: {:?}", response.error);
    let optimization = response.optimization.unwrap();
    assert!(optimization.warning.is_none());
    assert!(optimization.daily_schedules.len() <= 2);
    assert_eq!(optimization.removed_places_count, 0);

    let ids: Vec<&str> = optimization.places.iter().map(|scheduled| scheduled.place.id.as_str()).collect();
    assert_eq!(ids.len(), 5);
    for id in ["dep", "palace", "nihonbashi", "ginza", "dst"] {
        assert!(ids.contains(&id), "{} missing from {:?}", id, ids);
    }
    assert_eq!(ids.first(), Some(&"dep"));
    assert_eq!(ids.last(), Some(&"dst"));

    let flights = optimization
        .places
        .iter()
        .filter_map(|scheduled| scheduled.incoming_segment.as_ref())
        .filter(|segment| segment.transport_mode == TransportMode::Flight)
        .count();
    assert_eq!(flights, 0);
}

#[test]
fn long_haul_leg_gets_airport_stops() {
    let places = vec![
        TOKYO_STATION.wish("tokyo", "alice", 60, 4.0),
        OHORI_PARK.wish("fukuoka", "bob", 60, 4.0),
    ];
    let result = optimizer().optimize(&places, start(), 2).unwrap();

    assert_eq!(route_ids(&result), vec!["tokyo", "airport-HND-1", "airport-FUK-2", "fukuoka"]);
    let airports = result
        .route
        .iter()
        .filter(|place| place.role == PlaceRole::GeneratedAirport)
        .count();
    assert_eq!(airports, 2);

    let flight = &result.legs[1];
    assert_eq!(flight.from_id, "airport-HND-1");
    assert_eq!(flight.to_id, "airport-FUK-2");
    assert_eq!(flight.transport_mode, TransportMode::Flight);
    assert_eq!(result.legs[0].transport_mode, TransportMode::Car);
    assert!(result.converged());
}

#[test]
fn airport_hop_within_car_range_is_still_flown() {
    let places = vec![
        TOKYO_STATION.wish("tokyo", "alice", 60, 4.0),
        OKAYAMA_CASTLE.wish("okayama", "bob", 60, 4.0),
    ];
    let result = optimizer().optimize(&places, start(), 2).unwrap();

    assert_eq!(route_ids(&result), vec!["tokyo", "airport-HND-1", "airport-KIX-2", "okayama"]);
    let modes: Vec<TransportMode> = result.legs.iter().map(|leg| leg.transport_mode).collect();
    assert_eq!(modes, vec![TransportMode::Car, TransportMode::Flight, TransportMode::Car]);
    assert!(result.days[0].has_flight());
}

#[test]
fn same_station_round_trip_keeps_both_anchors() {
    let mut places = vec![TOKYO_STATION.departure()];
    places.push(TOKYO_CENTRAL[1].wish("nihonbashi", "alice", 60, 4.0));
    places.push(TOKYO_CENTRAL[2].wish("ginza", "bob", 60, 3.0));
    places.push(TOKYO_STATION.destination());

    let result = optimizer().optimize(&places, start(), 2).unwrap();
    let first = result.route.first().unwrap();
    let last = result.route.last().unwrap();
    assert_eq!((first.id.as_str(), first.role), ("departure", PlaceRole::DepartureAnchor));
    assert_eq!((last.id.as_str(), last.role), ("destination", PlaceRole::DestinationAnchor));
    assert_eq!(result.route.len(), 4);
    assert!(result.score.issues.is_empty(), "{:?}", result.score.issues);
}

#[test]
fn round_trip_to_sapporo_returns_home() {
    let places = vec![
        TOKYO_STATION.departure(),
        ODORI_PARK.wish("sapporo", "alice", 120, 5.0),
        CandidatePlace::system("destination", "Round trip", (0.0, 0.0), PlaceRole::DestinationAnchor, 0),
    ];
    let result = optimizer().optimize(&places, start(), 3).unwrap();

    let last = result.route.last().unwrap();
    assert_eq!(last.id, "departure-return");
    assert_eq!(last.location(), TOKYO_STATION.coords());
    // Out and back: CTS and HND on each leg.
    let airports: Vec<&str> = result
        .route
        .iter()
        .filter(|place| place.role == PlaceRole::GeneratedAirport)
        .map(|place| place.id.as_str())
        .collect();
    assert_eq!(airports.len(), 4);
    assert!(result.score.issues.iter().all(|issue| !issue.contains("duplicate")));
}

#[test]
fn shared_wish_is_merged_before_planning() {
    let places = vec![
        TOKYO_STATION.departure(),
        TOKYO_CENTRAL[1].wish("nihonbashi-a", "alice", 60, 4.0).with_color("#FF0000"),
        TOKYO_CENTRAL[1].wish("nihonbashi-b", "bob", 90, 2.0).with_color("#00FF00"),
        TOKYO_CENTRAL[2].wish("ginza", "bob", 60, 3.0),
    ];
    let result = optimizer().optimize(&places, start(), 1).unwrap();

    let merged: Vec<&CandidatePlace> = result
        .route
        .iter()
        .filter(|place| place.name == "Nihonbashi")
        .collect();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].stay_minutes, 90);
    assert_eq!(merged[0].contributors.len(), 2);
    assert_eq!(result.removed_places_count, 0);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn fair_selection_serves_both_members() {
    let places = normalize(&[
        TOKYO_CENTRAL[0].wish("a1", "alice", 60, 5.0),
        TOKYO_CENTRAL[1].wish("a2", "alice", 60, 4.0),
        TOKYO_CENTRAL[2].wish("a3", "alice", 60, 3.0),
        TOKYO_CENTRAL[3].wish("b1", "bob", 60, 5.0),
    ]);
    let selection = select(&places, 2);

    let from = |submitter: &str| {
        selection
            .places
            .iter()
            .filter(|place| place.submitted_by == submitter)
            .count()
    };
    assert_eq!(from("alice"), 1);
    assert_eq!(from("bob"), 1);
}

#[test]
fn departure_precedes_destination() {
    let mut places: Vec<CandidatePlace> = TOKYO_CENTRAL
        .iter()
        .enumerate()
        .map(|(i, location)| location.wish(&format!("w{}", i), if i % 2 == 0 { "alice" } else { "bob" }, 45, 3.0))
        .collect();
    // Anchors deliberately listed in reverse.
    places.insert(0, UENO_STATION.destination());
    places.push(TOKYO_STATION.departure());

    let result = optimizer().optimize(&places, start(), 2).unwrap();
    let ids = route_ids(&result);
    let dep = ids.iter().position(|id| *id == "departure").unwrap();
    let dst = ids.iter().position(|id| *id == "destination").unwrap();
    assert_eq!(dep, 0);
    assert_eq!(dst, ids.len() - 1);
}

#[test]
fn days_respect_cap_unless_flying() {
    let mut places: Vec<CandidatePlace> = TOKYO_CENTRAL
        .iter()
        .enumerate()
        .map(|(i, location)| location.wish(&format!("t{}", i), "alice", 150, 3.0))
        .collect();
    places.push(OHORI_PARK.wish("ohori", "bob", 200, 4.0));
    places.push(HAKATA_STATION.wish("hakata", "bob", 120, 4.0));

    let result = optimizer().optimize(&places, start(), 5).unwrap();
    for day in &result.days {
        assert!(!day.places.is_empty());
        if !day.has_flight() {
            assert!(day.total_minutes() <= 600, "day {} has {} minutes", day.day_index, day.total_minutes());
        }
    }
}

#[test]
fn one_day_twenty_wishes_converges_or_warns() {
    let places: Vec<CandidatePlace> = (0..20)
        .map(|i| {
            let location = &TOKYO_CENTRAL[i % TOKYO_CENTRAL.len()];
            let submitter = ["alice", "bob", "carol"][i % 3];
            CandidatePlace::wish(
                format!("w{}", i),
                format!("{} #{}", location.name, i),
                location.coords(),
                submitter,
                120,
                1.0 + (i % 5) as f64,
            )
        })
        .collect();

    let result = optimizer().optimize(&places, start(), 1).unwrap();
    assert!(result.iterations <= 10);
    assert!(result.days.len() <= 1 || result.warning.is_some());
    if result.state == SearchState::Converged {
        assert!(result.warning.is_none());
    }
}

#[test]
fn rerun_is_idempotent() {
    let mut places: Vec<CandidatePlace> = TOKYO_CENTRAL
        .iter()
        .enumerate()
        .map(|(i, location)| location.wish(&format!("w{}", i), ["alice", "bob"][i % 2], 120, (1 + i % 5) as f64))
        .collect();
    places.insert(0, TOKYO_STATION.departure());

    let first = optimizer().optimize(&places, start(), 2).unwrap();
    let second = optimizer().optimize(&places, start(), 2).unwrap();
    assert_eq!(route_ids(&first), route_ids(&second));
    assert_eq!(first.days.len(), second.days.len());
    assert_eq!(first.iterations, second.iterations);
    assert_eq!(first.score, second.score);
}

#[test]
fn malformed_request_fails_without_partial_result() {
    let json = r#"{
        "trip_id": "broken",
        "start_date": "2025-04-01",
        "end_date": "2025-04-02",
        "places": [
            {"id": "a", "name": "Nowhere", "submitted_by": "alice"}
        ]
    }"#;
    let request: TripRequest = serde_json::from_str(json).unwrap();
    let response = plan_trip(&request, FixedAirportTable::default());

    assert!(!response.success);
    assert!(response.optimization.is_none());
    assert!(response.error.unwrap().contains("coordinates"));
}
