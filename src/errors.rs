use thiserror::Error;

use crate::types::ParticipantId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("invalid payment frequency: {value:?}")]
    InvalidFrequency {
        value: String,
    },

    #[error("participant not found in ranking: {participant_id}")]
    ParticipantNotFound {
        participant_id: ParticipantId,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("record mismatch: {message}")]
    RecordMismatch {
        message: String,
    },

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
