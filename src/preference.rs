//! Per-submitter desirability normalization.
//!
//! Members rate on different personal scales; dividing by each member's own
//! mean puts everyone's wishes around 1.0.

use std::collections::HashMap;

use crate::model::{CandidatePlace, MAX_DESIRABILITY};

/// Returns a copy of `places` with `normalized_desirability` filled in.
pub fn normalize(places: &[CandidatePlace]) -> Vec<CandidatePlace> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for place in places.iter().filter(|place| !place.is_system()) {
        let entry = totals.entry(place.submitted_by.as_str()).or_insert((0.0, 0));
        entry.0 += place.raw_desirability;
        entry.1 += 1;
    }

    let means: HashMap<&str, f64> = totals
        .into_iter()
        .map(|(submitter, (sum, count))| {
            let mean = sum / count as f64;
            let mean = if mean.abs() < f64::EPSILON { 1.0 } else { mean };
            (submitter, mean)
        })
        .collect();

    places
        .iter()
        .map(|place| {
            let mut place = place.clone();
            place.normalized_desirability = if place.is_system() {
                MAX_DESIRABILITY
            } else {
                let mean = means.get(place.submitted_by.as_str()).copied().unwrap_or(1.0);
                place.raw_desirability / mean
            };
            place
        })
        .collect()
}
