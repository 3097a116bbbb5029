//! Airport lookup and airport-stop insertion for long-haul legs.
//!
//! Two directories implement [`AirportDirectory`]: the remote OurAirports
//! CSV and the built-in major-airport table. [`FallbackDirectory`] chains
//! them so a dataset outage only costs precision, never the run.

use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::airport_data::{self, MAJOR_AIRPORTS};
use crate::config::{AirportDatasetConfig, PlannerConfig};
use crate::error::{Error, Result};
use crate::haversine::haversine_km;
use crate::model::{CandidatePlace, PlaceRole, TransportMode};
use crate::traits::AirportDirectory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub iata: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Airport {
    pub fn location(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Synthetic, non-persistent route stop for this airport.
    pub fn to_place(&self, sequence: usize, stay_minutes: u32) -> CandidatePlace {
        let mut place = CandidatePlace::system(
            format!("airport-{}-{}", self.iata, sequence),
            format!("{} ({})", self.name, self.iata),
            self.location(),
            PlaceRole::GeneratedAirport,
            stay_minutes,
        )
        .with_category("airport");
        place.persistent = false;
        place
    }
}

fn nearest_of<'a>(
    airports: impl IntoIterator<Item = &'a Airport>,
    location: (f64, f64),
) -> Option<&'a Airport> {
    airports.into_iter().min_by(|a, b| {
        haversine_km(location, a.location()).total_cmp(&haversine_km(location, b.location()))
    })
}

/// The built-in table of major world airports.
#[derive(Debug, Clone)]
pub struct FixedAirportTable {
    airports: Vec<Airport>,
}

impl Default for FixedAirportTable {
    fn default() -> Self {
        let airports = MAJOR_AIRPORTS
            .iter()
            .map(|(iata, name, lat, lng)| Airport {
                iata: iata.to_string(),
                name: name.to_string(),
                latitude: *lat,
                longitude: *lng,
            })
            .collect();
        Self { airports }
    }
}

impl FixedAirportTable {
    pub fn new(airports: Vec<Airport>) -> Self {
        Self { airports }
    }
}

impl AirportDirectory for FixedAirportTable {
    fn nearest(&self, location: (f64, f64)) -> Option<Airport> {
        nearest_of(&self.airports, location).cloned()
    }
}

/// One row of the OurAirports `airports.csv`; other columns are ignored.
#[derive(Debug, Deserialize)]
struct AirportRecord {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    latitude_deg: Option<f64>,
    longitude_deg: Option<f64>,
    #[serde(default)]
    iata_code: String,
}

/// Parses an OurAirports-format CSV, keeping airports fit for a connection.
///
/// Entries need an IATA code and coordinates, must not match an excluded
/// term, and must be either curated or named "international". Rows that
/// fail to deserialize are skipped.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Vec<Airport>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    if !headers.iter().any(|header| header == "iata_code") {
        return Err(Error::airport_dataset("missing iata_code column"));
    }

    let mut airports = Vec::new();
    for record in csv_reader.deserialize::<AirportRecord>() {
        let Ok(record) = record else {
            continue;
        };
        let iata = record.iata_code.trim();
        let (Some(lat), Some(lng)) = (record.latitude_deg, record.longitude_deg) else {
            continue;
        };
        if iata.is_empty() || !lat.is_finite() || !lng.is_finite() {
            continue;
        }
        if airport_data::is_excluded(&record.name) || airport_data::is_excluded(&record.kind) {
            continue;
        }
        let major = airport_data::is_major_iata(iata);
        if !major && !record.name.to_lowercase().contains("international") {
            continue;
        }
        airports.push(Airport {
            iata: iata.to_string(),
            name: record.name.trim().to_string(),
            latitude: lat,
            longitude: lng,
        });
    }

    if airports.is_empty() {
        return Err(Error::airport_dataset("no qualifying airports in dataset"));
    }
    Ok(airports)
}

/// Airport directory backed by the remote open dataset.
///
/// The dataset is downloaded on first lookup. A failed download is not
/// retried; the directory then answers `None` for the rest of its life.
#[derive(Debug)]
pub struct RemoteAirportDirectory {
    config: AirportDatasetConfig,
    client: reqwest::blocking::Client,
    airports: OnceLock<Vec<Airport>>,
}

impl RemoteAirportDirectory {
    pub fn new(config: AirportDatasetConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            airports: OnceLock::new(),
        })
    }

    /// Downloads and parses the dataset.
    pub fn fetch(&self) -> Result<Vec<Airport>> {
        let body = self
            .client
            .get(&self.config.url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())?;
        parse_dataset(body.as_ref())
    }

    fn airports(&self) -> &[Airport] {
        self.airports.get_or_init(|| match self.fetch() {
            Ok(airports) => {
                info!(url = %self.config.url, count = airports.len(), "loaded airport dataset");
                airports
            }
            Err(err) => {
                warn!(url = %self.config.url, error = %err, "airport dataset unavailable");
                Vec::new()
            }
        })
    }
}

impl AirportDirectory for RemoteAirportDirectory {
    fn nearest(&self, location: (f64, f64)) -> Option<Airport> {
        nearest_of(self.airports(), location).cloned()
    }
}

/// Asks `primary` first and `secondary` when it has no answer.
#[derive(Debug, Clone)]
pub struct FallbackDirectory<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackDirectory<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: AirportDirectory, S: AirportDirectory> AirportDirectory for FallbackDirectory<P, S> {
    fn nearest(&self, location: (f64, f64)) -> Option<Airport> {
        self.primary.nearest(location).or_else(|| {
            debug!(lat = location.0, lng = location.1, "falling back to fixed airport table");
            self.secondary.nearest(location)
        })
    }
}

/// Remote dataset with the fixed table behind it.
pub fn default_directory(
    config: AirportDatasetConfig,
) -> Result<FallbackDirectory<RemoteAirportDirectory, FixedAirportTable>> {
    Ok(FallbackDirectory::new(
        RemoteAirportDirectory::new(config)?,
        FixedAirportTable::default(),
    ))
}

/// Inserts airport stops around every leg long enough to be flown.
///
/// The departure-side airport goes right after the leg's origin and the
/// arrival-side airport right before its destination. Endpoints that are
/// already airports get no extra stop, and a single stop is used when both
/// ends resolve to the same airport.
pub fn insert_airports<D: AirportDirectory>(
    route: &[CandidatePlace],
    directory: &D,
    config: &PlannerConfig,
) -> Vec<CandidatePlace> {
    let mut result = Vec::with_capacity(route.len());
    let mut sequence = 0;

    for (i, place) in route.iter().enumerate() {
        result.push(place.clone());
        let Some(next) = route.get(i + 1) else {
            continue;
        };

        let distance = haversine_km(place.location(), next.location());
        if config.travel.transport_mode(distance) != TransportMode::Flight {
            continue;
        }

        let origin = match place.role {
            PlaceRole::GeneratedAirport => None,
            _ => directory.nearest(place.location()),
        };
        let arrival = match next.role {
            PlaceRole::GeneratedAirport => None,
            _ => directory.nearest(next.location()),
        };

        if let Some(airport) = &origin {
            sequence += 1;
            result.push(airport.to_place(sequence, config.airport_stay_minutes));
        }
        if let Some(airport) = arrival {
            if origin.as_ref().is_some_and(|o| o.iata == airport.iata) {
                continue;
            }
            sequence += 1;
            result.push(airport.to_place(sequence, config.airport_stay_minutes));
        }
        debug!(from = %place.name, to = %next.name, distance_km = distance, "inserted airport stops");
    }

    result
}
