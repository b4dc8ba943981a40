use error_location::ErrorLocation;
use std::panic::Location;
use thiserror::Error;

/// Errors that can occur while consuming a monitor stream
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Stream rejected: {message} (status: {status}) {location}")]
    Rejected {
        status: u16,
        message: String,
        location: ErrorLocation,
    },
}

impl MonitorError {
    /// Convert reqwest error with context
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        MonitorError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        MonitorError::Rejected {
            status,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        MonitorError::from_reqwest(err)
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
