use crate::types::TrackedObject;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefereeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unknown team code '{code}'")]
    UnknownTeam { code: String },

    #[error("Invalid resolution '{0}'")]
    InvalidResolution(String),

    #[error("Geometry invariant violated: {0}")]
    GeometryInvariant(String),

    #[error("No unoccupied neutral spot available for {object}")]
    NoAvailableNeutralSpot { object: TrackedObject },

    #[error("Invalid match time: {0}")]
    InvalidTime(f64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RefereeResult<T> = Result<T, RefereeError>;
