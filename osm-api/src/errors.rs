//! Unified error types for the `osm-api` crate.
//!
//! Every call made through a client returns [`Result`]. Its [`Error`] tells
//! apart the four ways a call can end badly: rejected before any request was
//! sent, answered by the server with a non-2xx status, never answered, or
//! answered with a body that could not be decoded.
//!
//! Building a client and loading its configuration fail with their own types,
//! [`BuildError`] and [`ConfigError`].

use std::fmt;

use osm_common::{DataIntegrityError, EncodeError};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

// --- Build-Time Error ---

/// Errors that can occur while building a transport or a client.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    /// The API or interpreter base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    /// A multi-fetch chunk size of zero was requested.
    #[error("Multi-fetch chunk size must be greater than zero")]
    ZeroChunkSize,

    /// An Overpass client was given no interpreter to talk to.
    #[error("At least one Overpass interpreter URL is required")]
    NoEndpoints,

    /// An authenticated client was requested from a configuration without an `[auth]` table.
    #[error("The configuration does not contain credentials")]
    MissingCredentials,
}

// --- Configuration Error ---

/// Errors that can occur while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file did not exist or could not be read.
    #[error("Config file not found: {0}")]
    FileNotFound(#[from] std::io::Error),

    /// The TOML was invalid or did not match the expected shape.
    #[error("Config file is not valid: {0}")]
    FileNotValid(#[from] toml::de::Error),

    /// The user TOML could not be layered over the embedded defaults.
    #[error("Failed to merge embedded and user TOML: {0}")]
    Merge(String),
}

// --- The Main Operational Error Enum ---

/// The crate's top-level error type.
///
/// - [`Error::InvalidArgument`]: a precondition checked on the client failed; nothing was sent.
/// - [`Error::Api`]: the server answered with a non-2xx status.
/// - [`Error::Transport`]: no response arrived.
/// - [`Error::DataIntegrity`]: a 2xx response could not be turned into the requested value.
#[derive(Debug, Error)]
pub enum Error {
    /// A client-side precondition failed before any network I/O.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Human-readable explanation of what was invalid.
        message: String,
    },

    /// The server rejected the request.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The request never got a response.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response arrived but was unusable.
    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// HTTP status of an [`Error::Api`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(api) => Some(api.status),
            _ => None,
        }
    }

    /// Whether the server answered `404 Not Found` or `410 Gone`.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::NOT_FOUND | StatusCode::GONE)
        )
    }
}

// --- Server Rejection ---

/// A non-2xx response.
///
/// The OSM API explains rejections in the plain-text body, so `Display`
/// shows the body, falling back to the status reason when the body is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The URL that was requested.
    pub request_uri: Url,
    /// The status code returned by the server.
    pub status: StatusCode,
    /// The canonical reason phrase of `status`.
    pub reason_phrase: String,
    /// The response body, as text.
    pub body: String,
}

impl ApiError {
    /// The server's explanation: the trimmed body, or the reason phrase if the body is empty.
    pub fn message(&self) -> &str {
        let body = self.body.trim();
        if body.is_empty() {
            &self.reason_phrase
        } else {
            body
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} responded {} {}: {}",
            self.request_uri,
            self.status.as_u16(),
            self.reason_phrase,
            self.message()
        )
    }
}

impl std::error::Error for ApiError {}

// --- Transport Error ---

/// The request did not complete.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network/protocol failure from reqwest (timeouts, TLS, I/O, etc.).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller's cancellation token fired before the response was read.
    #[error("The request was cancelled")]
    Cancelled,
}

/// A specialized `Result` type for `osm-api` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

// Transport Errors
impl_from_for_error!(reqwest::Error, Error::Transport);

// Data Integrity Errors
impl_from_for_error!(std::str::Utf8Error, Error::DataIntegrity);
impl_from_for_error!(serde_json::Error, Error::DataIntegrity);

// Request bodies and addresses are built from caller input.
impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Error::invalid(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::invalid(format!("cannot build request URL: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(body: &str) -> ApiError {
        ApiError {
            request_uri: Url::parse("https://api.example/api/0.6/changeset/9").unwrap(),
            status: StatusCode::CONFLICT,
            reason_phrase: "Conflict".into(),
            body: body.into(),
        }
    }

    #[test]
    fn display_carries_the_server_reason() {
        let err = Error::from(api_error("The changeset 9 was closed at 2024-01-01 00:00:00 UTC\n"));
        let shown = err.to_string();
        assert!(shown.contains("409"));
        assert!(shown.contains("The changeset 9 was closed"));
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
        assert!(!err.is_not_found());
    }

    #[test]
    fn empty_body_falls_back_to_reason_phrase() {
        assert_eq!(api_error("  ").message(), "Conflict");
    }

    #[test]
    fn encode_failures_are_invalid_arguments() {
        let err = Error::from(url::ParseError::EmptyHost);
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }
}
