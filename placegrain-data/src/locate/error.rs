//! Error types produced by the relation resolver.

use std::time::Duration;

use thiserror::Error;

/// Transport-level failure of a single tile request.
///
/// These are retried and, once attempts are exhausted, degrade the tile to an
/// empty result rather than failing the run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server answered with a non-success HTTP status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request exceeded the client timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Fully qualified request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// Connecting or transferring failed.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Error reported by the transport.
        message: String,
    },
    /// The response body was not the expected JSON document.
    #[error("malformed response from {url}: {message}")]
    Decode {
        /// Fully qualified request URL.
        url: String,
        /// Parser error description.
        message: String,
    },
    /// The request URL could not be built.
    #[error("invalid endpoint {endpoint}: {source}")]
    Endpoint {
        /// Configured endpoint.
        endpoint: String,
        /// URL parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Fatal failure while building the relation location map.
#[derive(Debug, Error)]
pub enum LocateError {
    /// Building the HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Building the Tokio runtime failed.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The overall time limit elapsed before every tile finished.
    #[error("relation lookup did not finish within {limit:?}")]
    Timeout {
        /// Configured limit.
        limit: Duration,
    },
}
