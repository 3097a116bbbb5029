//! Packs a timed route into day buckets.
//!
//! Every day starts at `day_start_minutes`. A place joins the current day
//! while travel plus visit minutes stay within the daily cap and the visit
//! ends by the cutoff; otherwise a new day opens. Flights are the exception:
//! a flight leg always lands on the day it departs, and once a day contains
//! a flight only the cutoff limits what follows it.
//!
//! The builder never drops places. Deciding what to leave out is the
//! optimizer's job.

use chrono::{Days, NaiveDate, NaiveTime};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::model::{
    CandidatePlace, DaySchedule, PlaceRole, ScheduledPlace, TransportMode, TravelSegment,
};

#[derive(Debug, Default)]
struct DayBucket {
    places: Vec<ScheduledPlace>,
    travel: u32,
    visit: u32,
    has_flight: bool,
}

impl DayBucket {
    fn total(&self) -> u32 {
        self.travel + self.visit
    }

    fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// Builds day schedules for `route`, where `legs[i]` arrives at `route[i + 1]`.
pub fn build_daily_schedule(
    route: &[CandidatePlace],
    legs: &[TravelSegment],
    start_date: NaiveDate,
    config: &PlannerConfig,
) -> Vec<DaySchedule> {
    let cap = config.daily_cap_minutes;
    let cutoff = config.day_end_minutes;

    let mut days: Vec<DaySchedule> = Vec::new();
    let mut bucket = DayBucket::default();
    let mut clock = config.day_start_minutes;

    for (i, place) in route.iter().enumerate() {
        let incoming = i.checked_sub(1).and_then(|prev| legs.get(prev)).cloned();
        let travel = incoming.as_ref().map_or(0, |leg| leg.travel_minutes);
        let is_flight = incoming
            .as_ref()
            .is_some_and(|leg| leg.transport_mode == TransportMode::Flight);
        let is_final_destination =
            place.role == PlaceRole::DestinationAnchor && i + 1 == route.len();
        let mut visit = place.stay_minutes;

        let fits = if bucket.is_empty() || is_flight {
            true
        } else if is_final_destination {
            // Only arrival matters for the end of the trip.
            clock + travel <= cutoff
                && (bucket.has_flight || bucket.total() + travel + visit <= cap)
        } else if bucket.has_flight {
            clock + travel + visit <= cutoff
        } else {
            bucket.total() + travel + visit <= cap && clock + travel + visit <= cutoff
        };

        if !fits {
            close_day(&mut days, &mut bucket, start_date);
            clock = config.day_start_minutes;
        }

        if bucket.is_empty() && !is_flight && travel + visit > cap {
            let shortened = cap.saturating_sub(travel);
            debug!(place = %place.name, stay = visit, shortened, "visit longer than a day");
            visit = shortened;
        }

        let arrival = clock + travel;
        let departure = arrival + visit;
        clock = departure;

        bucket.places.push(ScheduledPlace {
            place: place.clone(),
            arrival_time: clamp_time(arrival, config),
            departure_time: clamp_time(departure, config),
            order_in_day: bucket.places.len() as u32 + 1,
            incoming_segment: incoming,
        });
        bucket.travel += travel;
        bucket.visit += visit;
        bucket.has_flight |= is_flight;

        if is_flight && clock >= cutoff {
            close_day(&mut days, &mut bucket, start_date);
            clock = config.day_start_minutes;
        }
    }
    close_day(&mut days, &mut bucket, start_date);

    debug!(places = route.len(), days = days.len(), "built daily schedule");
    days
}

fn close_day(days: &mut Vec<DaySchedule>, bucket: &mut DayBucket, start_date: NaiveDate) {
    if bucket.is_empty() {
        return;
    }
    let bucket = std::mem::take(bucket);
    let offset = days.len() as u64;
    days.push(DaySchedule {
        day_index: offset as u32 + 1,
        date: start_date + Days::new(offset),
        places: bucket.places,
        total_travel_minutes: bucket.travel,
        total_visit_minutes: bucket.visit,
    });
}

fn clamp_time(minutes: u32, config: &PlannerConfig) -> NaiveTime {
    let minutes = minutes.clamp(config.day_start_minutes, config.latest_minutes);
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap_or_default()
}
