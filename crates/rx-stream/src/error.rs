use rx_db::DbError;

use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Tenant not found: {subdomain} {location}")]
    TenantNotFound {
        subdomain: String,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Connection closed: {connection_id} {location}")]
    ConnectionClosed {
        connection_id: String,
        location: ErrorLocation,
    },

    #[error("Send buffer full, client too slow: {connection_id} {location}")]
    SendBufferFull {
        connection_id: String,
        location: ErrorLocation,
    },

    #[error("Storage error: {source} {location}")]
    Storage {
        #[source]
        source: DbError,
        location: ErrorLocation,
    },
}

impl StreamError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TenantNotFound { .. } => "NOT_FOUND",
            Self::ConnectionLimitExceeded { .. } => "CONNECTION_LIMIT",
            Self::ConnectionClosed { .. } => "CONNECTION_CLOSED",
            Self::SendBufferFull { .. } => "SLOW_CLIENT",
            Self::Storage { .. } => "STORAGE_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::TenantNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ConnectionLimitExceeded { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body sent before a stream is established
#[derive(Debug, Serialize)]
struct StreamErrorResponse {
    error: StreamErrorBody,
}

#[derive(Debug, Serialize)]
struct StreamErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        log::error!("{}", self);

        let status = self.status_code();
        let message = match &self {
            // Don't expose internal storage details to clients
            Self::Storage { .. } => "Storage operation failed".to_string(),
            Self::TenantNotFound { subdomain, .. } => format!("Tenant {subdomain} not found"),
            other => other.to_string(),
        };

        let body = StreamErrorResponse {
            error: StreamErrorBody {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for StreamError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::Storage {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
