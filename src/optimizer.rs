//! Iterative select, sequence and schedule loop.
//!
//! Each iteration plans the current candidate pool end to end. If the plan
//! needs more days than the trip has, the [`TrimStrategy`] shrinks the pool
//! and the loop retries, keeping the latest plan as a best-effort answer.
//!
//! ```text
//! Searching --fits--> Converged
//!     |--iteration cap / time budget--> BestEffort
//!     `--nothing left to trim-------> Infeasible (system places alone overflow)
//! ```

use std::collections::HashSet;
use std::time::Instant;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::airports::insert_airports;
use crate::config::PlannerConfig;
use crate::dedup::deduplicate;
use crate::error::Result;
use crate::model::{CandidatePlace, DaySchedule, TravelSegment};
use crate::preference::normalize;
use crate::schedule::build_daily_schedule;
use crate::score::{OptimizationScore, score};
use crate::selector::select;
use crate::sequencer::{compute_legs, sequence};
use crate::traits::{AirportDirectory, TrimStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    Searching,
    Converged,
    BestEffort,
    Infeasible,
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub state: SearchState,
    pub route: Vec<CandidatePlace>,
    pub legs: Vec<TravelSegment>,
    pub days: Vec<DaySchedule>,
    pub iterations: usize,
    pub removed_places_count: usize,
    pub selection_fairness: f64,
    pub warning: Option<String>,
    pub score: OptimizationScore,
}

impl OptimizationResult {
    /// True when the plan fits the trip length.
    pub fn converged(&self) -> bool {
        self.state == SearchState::Converged
    }
}

/// Discards the lowest-ranked share of user wishes each time.
#[derive(Debug, Clone)]
pub struct LowestDesirabilityTrim {
    pub fraction: f64,
}

impl Default for LowestDesirabilityTrim {
    fn default() -> Self {
        Self { fraction: 0.3 }
    }
}

impl TrimStrategy for LowestDesirabilityTrim {
    fn trim(&self, candidates: &[CandidatePlace]) -> Vec<CandidatePlace> {
        let wishes = candidates.iter().filter(|place| !place.is_system()).count();
        let remove = ((wishes as f64 * self.fraction).ceil() as usize).clamp(1, wishes.max(1));
        drop_lowest(candidates, remove)
    }
}

/// Keeps the better half of the user wishes, bisecting the pool size.
#[derive(Debug, Clone, Default)]
pub struct HalvingTrim;

impl TrimStrategy for HalvingTrim {
    fn trim(&self, candidates: &[CandidatePlace]) -> Vec<CandidatePlace> {
        let wishes = candidates.iter().filter(|place| !place.is_system()).count();
        drop_lowest(candidates, wishes - wishes / 2)
    }
}

/// Removes `count` user wishes with the lowest normalized desirability.
/// Among equals, the one listed last goes first.
fn drop_lowest(candidates: &[CandidatePlace], count: usize) -> Vec<CandidatePlace> {
    let mut ranked: Vec<(usize, &CandidatePlace)> = candidates
        .iter()
        .enumerate()
        .filter(|(_, place)| !place.is_system())
        .collect();
    ranked.sort_by(|(ia, a), (ib, b)| {
        a.normalized_desirability
            .total_cmp(&b.normalized_desirability)
            .then(ib.cmp(ia))
    });
    let dropped: HashSet<usize> = ranked.iter().take(count).map(|(idx, _)| *idx).collect();

    candidates
        .iter()
        .enumerate()
        .filter(|(idx, _)| !dropped.contains(idx))
        .map(|(_, place)| place.clone())
        .collect()
}

#[derive(Debug, Clone)]
struct Plan {
    selected: Vec<CandidatePlace>,
    route: Vec<CandidatePlace>,
    legs: Vec<TravelSegment>,
    days: Vec<DaySchedule>,
    fairness: f64,
}

pub struct Optimizer<D, T = LowestDesirabilityTrim> {
    directory: D,
    strategy: T,
    config: PlannerConfig,
}

impl<D: AirportDirectory> Optimizer<D, LowestDesirabilityTrim> {
    pub fn new(directory: D, config: PlannerConfig) -> Self {
        let strategy = LowestDesirabilityTrim {
            fraction: config.trim_fraction,
        };
        Self::with_strategy(directory, strategy, config)
    }
}

impl<D: AirportDirectory, T: TrimStrategy> Optimizer<D, T> {
    pub fn with_strategy(directory: D, strategy: T, config: PlannerConfig) -> Self {
        Self {
            directory,
            strategy,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans `candidates` into at most `available_days` days starting on
    /// `start_date`, or the closest thing to it.
    ///
    /// Only a structural problem with the anchors is returned as an error;
    /// overflowing the trip yields a result with a warning.
    pub fn optimize(
        &self,
        candidates: &[CandidatePlace],
        start_date: NaiveDate,
        available_days: usize,
    ) -> Result<OptimizationResult> {
        let started = Instant::now();
        let prepared = normalize(&deduplicate(candidates));

        let user_count = prepared.iter().filter(|place| !place.is_system()).count();
        let system_count = prepared.len() - user_count;
        let per_iteration = self.config.places_per_iteration.max(1);
        let max_iterations = user_count
            .div_ceil(per_iteration)
            .min(self.config.max_iterations)
            .max(1);
        let max_places = system_count + available_days * self.config.places_per_day;

        let mut pool = prepared.clone();
        let mut best: Option<Plan> = None;
        let mut state = SearchState::Searching;
        let mut warning = None;
        let mut iterations = 0;

        while state == SearchState::Searching {
            if iterations >= max_iterations {
                state = SearchState::BestEffort;
                break;
            }
            if started.elapsed() >= self.config.time_budget() {
                state = SearchState::BestEffort;
                warning = Some(format!(
                    "time budget of {}s used up after {} iterations",
                    self.config.time_budget_secs, iterations
                ));
                break;
            }
            iterations += 1;

            match self.run_iteration(&pool, max_places, start_date) {
                Ok(plan) => {
                    let fits = plan.days.len() <= available_days;
                    info!(
                        iteration = iterations,
                        candidates = pool.len(),
                        route = plan.route.len(),
                        days = plan.days.len(),
                        available_days,
                        fits,
                        "optimizer iteration"
                    );
                    pool = plan.selected.clone();
                    best = Some(plan);
                    if fits {
                        state = SearchState::Converged;
                        break;
                    }
                }
                Err(err) => {
                    warn!(iteration = iterations, error = %err, "iteration failed, trimming");
                }
            }

            let trimmed = self.strategy.trim(&pool);
            if trimmed.len() == pool.len() {
                let wishes_left = pool.iter().any(|place| !place.is_system());
                state = if wishes_left {
                    SearchState::BestEffort
                } else {
                    SearchState::Infeasible
                };
                break;
            }
            pool = trimmed;
        }

        let plan = match best {
            Some(plan) => plan,
            None => {
                let system: Vec<CandidatePlace> =
                    prepared.iter().filter(|place| place.is_system()).cloned().collect();
                self.run_iteration(&system, system.len(), start_date)?
            }
        };

        if warning.is_none() && state != SearchState::Converged {
            warning = Some(match state {
                SearchState::Infeasible => format!(
                    "even the fixed stops need {} days but only {} are available",
                    plan.days.len(),
                    available_days
                ),
                _ => format!(
                    "best effort: plan needs {} days but only {} are available",
                    plan.days.len(),
                    available_days
                ),
            });
        }

        let kept: HashSet<&str> = plan.route.iter().map(|place| place.id.as_str()).collect();
        let removed_places_count = prepared
            .iter()
            .filter(|place| !place.is_system() && !kept.contains(place.id.as_str()))
            .count();

        let score = score(&prepared, &plan.route, &plan.legs, &plan.days, &self.config);
        info!(
            ?state,
            iterations,
            days = plan.days.len(),
            removed = removed_places_count,
            score = score.total,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "optimization finished"
        );

        Ok(OptimizationResult {
            state,
            route: plan.route,
            legs: plan.legs,
            days: plan.days,
            iterations,
            removed_places_count,
            selection_fairness: plan.fairness,
            warning,
            score,
        })
    }

    fn run_iteration(
        &self,
        candidates: &[CandidatePlace],
        max_places: usize,
        start_date: NaiveDate,
    ) -> Result<Plan> {
        let selection = select(candidates, max_places);
        let route = sequence(&selection.places)?;
        let route = insert_airports(&route, &self.directory, &self.config);
        let legs = compute_legs(&route, &self.config.travel);
        let days = build_daily_schedule(&route, &legs, start_date, &self.config);

        Ok(Plan {
            selected: selection.places,
            route,
            legs,
            days,
            fairness: selection.fairness_score,
        })
    }
}
