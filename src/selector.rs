//! Fairness-constrained trimming of the candidate set.
//!
//! Members take turns: in each round every member with candidates left may
//! add their best remaining wish, unless they already hold a share of the
//! selection at or above the fairness weight.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::CandidatePlace;

/// Safety cap on selection rounds.
const MAX_ROUNDS: u32 = 100;

#[derive(Debug, Clone)]
pub struct Selection {
    /// System places plus the chosen wishes, in input order.
    pub places: Vec<CandidatePlace>,
    /// min/max of per-submitter selected counts, 1.0 when nobody competes.
    pub fairness_score: f64,
}

/// Share of the selection above which a member stops being favored.
pub fn fairness_weight(submitter_count: usize) -> f64 {
    (1.0 - 0.1 * submitter_count as f64).max(0.5)
}

pub fn select(candidates: &[CandidatePlace], max_places: usize) -> Selection {
    let system_count = candidates.iter().filter(|place| place.is_system()).count();
    let budget = max_places.saturating_sub(system_count);

    let mut groups: Vec<(&str, Vec<&CandidatePlace>)> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    for place in candidates.iter().filter(|place| !place.is_system()) {
        let submitter = place.submitted_by.as_str();
        let idx = *group_index.entry(submitter).or_insert_with(|| {
            groups.push((submitter, Vec::new()));
            groups.len() - 1
        });
        groups[idx].1.push(place);
    }
    let wish_count: usize = groups.iter().map(|(_, wishes)| wishes.len()).sum();

    if wish_count <= budget {
        let counts: Vec<usize> = groups.iter().map(|(_, wishes)| wishes.len()).collect();
        return Selection {
            places: candidates.to_vec(),
            fairness_score: balance(&counts),
        };
    }

    for (_, wishes) in groups.iter_mut() {
        // Stable: equal scores keep input order.
        wishes.sort_by(|a, b| b.normalized_desirability.total_cmp(&a.normalized_desirability));
    }

    let weight = fairness_weight(groups.len());
    let mut cursors = vec![0usize; groups.len()];
    let mut counts = vec![0usize; groups.len()];
    let mut rounds: HashMap<&str, u32> = HashMap::new();
    let mut total = 0usize;

    'rounds: for round in 1..=MAX_ROUNDS {
        let mut picked_this_round = false;

        for (g, (_, wishes)) in groups.iter().enumerate() {
            if total >= budget {
                break 'rounds;
            }
            if cursors[g] >= wishes.len() {
                continue;
            }
            let ratio = counts[g] as f64 / total.max(1) as f64;
            if total == 0 || ratio < weight {
                rounds.insert(wishes[cursors[g]].id.as_str(), round);
                cursors[g] += 1;
                counts[g] += 1;
                total += 1;
                picked_this_round = true;
            }
        }

        if total >= budget {
            break;
        }
        if !picked_this_round {
            // Everyone left is over-represented; hand out one each anyway.
            for (g, (_, wishes)) in groups.iter().enumerate() {
                if total >= budget {
                    break 'rounds;
                }
                if cursors[g] < wishes.len() {
                    rounds.insert(wishes[cursors[g]].id.as_str(), round);
                    cursors[g] += 1;
                    counts[g] += 1;
                    total += 1;
                    picked_this_round = true;
                }
            }
            if !picked_this_round {
                break;
            }
        }
    }

    let chosen: HashSet<&str> = rounds.keys().copied().collect();
    let places = candidates
        .iter()
        .filter(|place| place.is_system() || chosen.contains(place.id.as_str()))
        .map(|place| {
            let mut place = place.clone();
            place.selection_round = rounds.get(place.id.as_str()).copied();
            place
        })
        .collect();

    let fairness_score = balance(&counts);
    debug!(
        candidates = wish_count,
        budget,
        selected = total,
        weight,
        fairness_score,
        "fair selection complete"
    );

    Selection {
        places,
        fairness_score,
    }
}

fn balance(counts: &[usize]) -> f64 {
    let max = counts.iter().copied().max().unwrap_or(0);
    let min = counts.iter().copied().min().unwrap_or(0);
    if max == 0 {
        1.0
    } else {
        min as f64 / max as f64
    }
}
