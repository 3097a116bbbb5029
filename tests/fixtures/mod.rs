//! Test fixtures for trip-planner.
//!
//! Provides realistic test data including:
//! - Real Tokyo / Fukuoka / Sapporo locations (from OpenStreetMap)
//! - Builders for the planner's candidate places

#![allow(dead_code)]

pub mod japan_locations;

pub use japan_locations::*;
