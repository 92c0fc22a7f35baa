//! Error types for the Tutto API client.
//!
//! # Design
//! Transport failures are kept in their own enum so a custom `Transport`
//! can report them without knowing about the rest of the client. The client
//! passes them through unchanged inside `ClientError::Transport`.
//!
//! There is no "not authenticated" variant: a failed authentication leaves
//! the request without a bearer header and the server's answer comes back as
//! a `TransportError::Status`.

use thiserror::Error;

/// Failures reported by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, TLS, I/O).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("could not decode response body: {0}")]
    Decode(String),
}

/// Errors returned by the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or contradictory settings, raised at construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The endpoint name is not part of the catalog.
    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),

    /// The parameter bag does not fit the endpoint's schema.
    #[error("invalid parameters for endpoint '{endpoint}': {source}")]
    InvalidParameters {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// An authentication response list field could not be parsed.
    #[error("malformed credential field '{field}': {value:?}")]
    MalformedCredential { field: &'static str, value: String },

    /// A placeholder endpoint was invoked.
    #[error("endpoint '{0}' is not supported and cannot be invoked")]
    PlaceholderEndpoint(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
