//! trip-planner core
//!
//! Turns the places a travel group wants to see into a day-by-day itinerary
//! that fits the trip length, shared fairly between members.

pub mod traits;
pub mod model;
pub mod config;
pub mod error;
pub mod haversine;
pub mod preference;
pub mod dedup;
pub mod airport_data;
pub mod airports;
pub mod selector;
pub mod sequencer;
pub mod schedule;
pub mod optimizer;
pub mod score;
pub mod api;

pub use error::{Error, Result};
