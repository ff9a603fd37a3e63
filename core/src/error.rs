//! Error types for the institution client, the transport seam, the rate
//! limiter configuration and the importer run.
//!
//! # Design
//! `ApiError` separates the statuses callers branch on (401, 404, 409) from
//! the catch-all `HttpError`. `ImportError` only covers failures of the run
//! itself; per-line outcomes, including authentication failure, are data.

use thiserror::Error;

/// Errors returned by `InstitutionClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: the bearer token is missing, invalid or expired.
    #[error("unauthorized")]
    Unauthorized,

    /// 404: the requested institution does not exist.
    #[error("resource not found")]
    NotFound,

    /// 409: an institution with this name already exists.
    #[error("duplicate institution: {body}")]
    Duplicate { body: String },

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// A request that produced no usable HTTP response.
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    pub message: String,
    /// Some clients surface a status alongside the failure; a 401 here is
    /// still an authentication failure.
    pub status: Option<u16>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Rejected `RateConfig` values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateConfigError {
    #[error("tokens per interval must be at least 1")]
    ZeroTokens,

    #[error("interval must be longer than zero")]
    ZeroInterval,

    #[error("capacity {capacity} is smaller than tokens per interval {tokens_per_interval}")]
    CapacityTooSmall {
        capacity: u32,
        tokens_per_interval: u32,
    },
}

/// Failures that stop an import run before the input is exhausted.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("reading input failed: {0}")]
    Input(#[source] std::io::Error),

    #[error("writing retry log failed: {0}")]
    RetryLog(#[source] std::io::Error),
}
