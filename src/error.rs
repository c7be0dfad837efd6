//! Error types shared by the page and the worker.

use thiserror::Error;

/// Failures surfaced by the offline cache policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The network fetch itself failed (rejected), as opposed to a non-ok status.
    #[error("network request for {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// The host cache storage rejected an operation.
    #[error("cache storage error: {0}")]
    Storage(String),

    /// The host handed back something that is not a response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The worker's own location could not be parsed into an origin.
    #[error("invalid worker origin {0:?}")]
    InvalidOrigin(String),
}

/// Failures parsing the countdown target.
#[derive(Error, Debug)]
pub enum CountdownError {
    #[error("invalid target instant {input:?}: {source}")]
    InvalidTarget {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Boot-time misconfiguration of the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootError {
    #[error("no global window")]
    NoWindow,

    #[error("missing element #{0}")]
    MissingElement(&'static str),
}

/// A specialized `Result` type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
