//! Merges places several members submitted independently.
//!
//! Two entries are the same place when their coordinates agree to four
//! decimals (about 11 m) and their names match. Anchors of different roles
//! are never merged with each other.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{CandidatePlace, ColorType, Contributor};

/// Highlight color for places wanted by five or more members.
pub const POPULAR_COLOR: &str = "#FFD700";

const GRADIENT_MAX_CONTRIBUTORS: usize = 4;

/// Collapses duplicates, preserving the order in which keys first appear.
pub fn deduplicate(places: &[CandidatePlace]) -> Vec<CandidatePlace> {
    let mut groups: Vec<Vec<&CandidatePlace>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for place in places {
        let mut key = dedup_key(place);
        if let Some(&group) = index.get(&key) {
            // A round trip names the same station as departure and destination.
            let clashes = place.is_system()
                && groups[group]
                    .iter()
                    .any(|member| member.is_system() && member.role != place.role);
            if clashes {
                key = format!("{}|{:?}", key, place.role);
            }
        }
        match index.get(&key) {
            Some(&group) => groups[group].push(place),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![place]);
            }
        }
    }

    groups
        .into_iter()
        .map(|group| match group.as_slice() {
            [single] => (*single).clone(),
            members => merge(members),
        })
        .collect()
}

fn dedup_key(place: &CandidatePlace) -> String {
    format!("{:.4},{:.4},{}", place.latitude, place.longitude, place.name)
}

fn merge(members: &[&CandidatePlace]) -> CandidatePlace {
    // An anchor absorbing a duplicate wish must stay an anchor.
    let base = members
        .iter()
        .find(|place| place.is_system())
        .unwrap_or(&members[0]);
    let mut merged = (*base).clone();

    merged.stay_minutes = members.iter().map(|place| place.stay_minutes).max().unwrap_or(0);
    merged.raw_desirability = members
        .iter()
        .map(|place| place.raw_desirability)
        .fold(f64::MIN, f64::max);
    merged.normalized_desirability = members
        .iter()
        .map(|place| place.normalized_desirability)
        .fold(f64::MIN, f64::max);

    let mut contributors: Vec<Contributor> = Vec::new();
    for contributor in members.iter().flat_map(|place| place.contributors.iter()) {
        match contributors
            .iter_mut()
            .find(|existing| existing.submitter == contributor.submitter)
        {
            Some(existing) => {
                existing.desirability = existing.desirability.max(contributor.desirability);
                if existing.color.is_none() {
                    existing.color = contributor.color.clone();
                }
            }
            None => contributors.push(contributor.clone()),
        }
    }

    merged.color_type = match contributors.len() {
        0 | 1 => ColorType::Single,
        n if n <= GRADIENT_MAX_CONTRIBUTORS => ColorType::Gradient,
        _ => ColorType::Popular,
    };
    merged.color = match merged.color_type {
        ColorType::Single => contributors
            .first()
            .and_then(|contributor| contributor.color.clone())
            .or(merged.color),
        ColorType::Gradient => blend_colors(&contributors).or(merged.color),
        ColorType::Popular => Some(POPULAR_COLOR.to_string()),
    };
    merged.contributors = contributors;

    debug!(
        place = %merged.name,
        merged = members.len(),
        contributors = merged.contributors.len(),
        "merged duplicate place"
    );
    merged
}

/// Per-channel average of the contributors' `#RRGGBB` colors.
fn blend_colors(contributors: &[Contributor]) -> Option<String> {
    let rgbs: Vec<(u32, u32, u32)> = contributors
        .iter()
        .filter_map(|contributor| contributor.color.as_deref().and_then(parse_hex))
        .collect();
    if rgbs.is_empty() {
        return None;
    }

    let n = rgbs.len() as u32;
    let (r, g, b) = rgbs
        .iter()
        .fold((0, 0, 0), |acc, rgb| (acc.0 + rgb.0, acc.1 + rgb.1, acc.2 + rgb.2));
    Some(format!("#{:02X}{:02X}{:02X}", r / n, g / n, b / n))
}

fn parse_hex(color: &str) -> Option<(u32, u32, u32)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(((value >> 16) & 0xFF, (value >> 8) & 0xFF, value & 0xFF))
}
