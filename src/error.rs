//! Crate error type.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("trip record is missing")]
    MissingTrip,
    #[error("no derivable anchors: {0}")]
    NoDerivableAnchor(String),
    #[error("airport dataset: {0}")]
    AirportDataset(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    pub fn no_anchor(message: impl Into<String>) -> Self {
        Self::NoDerivableAnchor(message.into())
    }

    pub fn airport_dataset(message: impl Into<String>) -> Self {
        Self::AirportDataset(message.into())
    }
}
