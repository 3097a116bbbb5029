//! Plan validation and composite quality score.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::model::{CandidatePlace, DaySchedule, PlaceRole, TravelSegment};

/// Sub-scores and composite, all on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationScore {
    pub total: f64,
    pub fairness: f64,
    pub efficiency: f64,
    pub feasibility: f64,
    /// Human-readable validation problems; empty for a clean plan.
    pub issues: Vec<String>,
}

pub fn validate(
    route: &[CandidatePlace],
    legs: &[TravelSegment],
    days: &[DaySchedule],
    config: &PlannerConfig,
) -> Vec<String> {
    let mut issues = Vec::new();

    let departure = route
        .iter()
        .find(|place| place.role == PlaceRole::DepartureAnchor)
        .map(|place| place.name.as_str());
    let mut seen = HashSet::new();
    for place in route.iter().filter(|place| place.role != PlaceRole::GeneratedAirport) {
        // Ending where the trip started is not a duplicate.
        if place.role == PlaceRole::DestinationAnchor && Some(place.name.as_str()) == departure {
            continue;
        }
        if !seen.insert(place.name.as_str()) {
            issues.push(format!("duplicate place '{}' in route", place.name));
        }
    }

    for leg in legs.iter().filter(|leg| leg.travel_minutes > config.max_leg_minutes) {
        issues.push(format!(
            "leg {} -> {} takes {} minutes",
            leg.from_id, leg.to_id, leg.travel_minutes
        ));
    }

    for day in days {
        if day.total_visit_minutes == 0 {
            issues.push(format!("day {} has no visit time", day.day_index));
        }
        if day.total_travel_minutes > config.max_day_travel_minutes {
            issues.push(format!(
                "day {} has {} minutes of travel",
                day.day_index, day.total_travel_minutes
            ));
        }
    }

    if !days.is_empty() {
        let flight_days = days.iter().filter(|day| day.has_flight()).count();
        let fraction = flight_days as f64 / days.len() as f64;
        if fraction > config.max_flight_day_fraction {
            issues.push(format!("{} of {} days include a flight", flight_days, days.len()));
        }
    }

    issues
}

/// Scores a plan. `candidates` is the full pre-selection wish list, so
/// members who got nothing still count against fairness.
///
/// Normalized desirability averages 1.0 per member over everything they
/// submitted, so its mean over the kept wishes is 1.0 when nothing is cut
/// and usually above it once trimming drops the weakest. The desirability
/// term is that mean clamped to [0, 1]: full credit whenever the route keeps
/// at least an average wish list, and a penalty only when the kept wishes
/// rank below a member's own average. The total therefore stays within 0-100.
pub fn score(
    candidates: &[CandidatePlace],
    route: &[CandidatePlace],
    legs: &[TravelSegment],
    days: &[DaySchedule],
    config: &PlannerConfig,
) -> OptimizationScore {
    let issues = validate(route, legs, days, config);

    let visit: u32 = days.iter().map(|day| day.total_visit_minutes).sum();
    let travel: u32 = days.iter().map(|day| day.total_travel_minutes).sum();
    let efficiency = if visit + travel == 0 {
        0.0
    } else {
        visit as f64 / (visit + travel) as f64
    };

    let wishes: Vec<&CandidatePlace> = route.iter().filter(|place| !place.is_system()).collect();
    let desirability = if wishes.is_empty() {
        0.0
    } else {
        let mean = wishes.iter().map(|place| place.normalized_desirability).sum::<f64>()
            / wishes.len() as f64;
        mean.clamp(0.0, 1.0)
    };

    let fairness = fairness(candidates, &wishes);

    let feasibility = if issues.is_empty() {
        1.0
    } else {
        (1.0 - 0.2 * issues.len() as f64).max(0.1)
    };

    let total = 100.0 * (0.3 * efficiency + 0.2 * desirability + 0.2 * fairness + 0.3 * feasibility);

    OptimizationScore {
        total,
        fairness: 100.0 * fairness,
        efficiency: 100.0 * efficiency,
        feasibility: 100.0 * feasibility,
        issues,
    }
}

/// `1 - variance/mean` of per-submitter selected counts, floored at 0.
fn fairness(candidates: &[CandidatePlace], selected: &[&CandidatePlace]) -> f64 {
    let mut counts: HashMap<&str, f64> = HashMap::new();
    for place in candidates.iter().filter(|place| !place.is_system()) {
        counts.entry(place.submitted_by.as_str()).or_insert(0.0);
    }
    for place in selected {
        *counts.entry(place.submitted_by.as_str()).or_insert(0.0) += 1.0;
    }
    if counts.is_empty() {
        return 0.0;
    }

    let n = counts.len() as f64;
    let mean = counts.values().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = counts.values().map(|count| (count - mean).powi(2)).sum::<f64>() / n;
    (1.0 - variance / mean).max(0.0)
}
