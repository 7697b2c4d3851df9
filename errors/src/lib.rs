//! # Inputs Engine Errors
//!
//! Error types shared by every crate of the inputs engine.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields so messages stay readable when new context is added
//! - Recoverable source failures (`SourceError`) are logged and swallowed by
//!   the loaders; `InputsError` is what escapes to callers

use thiserror::Error;

/// Failure of the remote parameter service.
///
/// Always fatal: the orchestrator aborts initialization and stays unparsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigFetchError {
    #[error("Error retrieving secure params from API ({detail})")]
    BadStatus { status: u16, detail: String },

    #[error("Error retrieving secure params from API ({detail})")]
    MalformedBody { detail: String },

    #[error("Error retrieving secure params from API ({reason})")]
    Transport { reason: String },
}

/// Failure while reading a local source (config file, results file, schema).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// Failure talking to an external broker (blocking queue or key/value store).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BrokerError {
    #[error("Connection to {backend} failed: {reason}")]
    Connection { backend: String, reason: String },

    #[error("Query on {backend} failed: {reason}")]
    Query { backend: String, reason: String },

    #[error("Could not decode payload from {channel}: {reason}")]
    Decode { channel: String, reason: String },

    #[error("No payload arrived on {channel} within {timeout_seconds}s")]
    Timeout { channel: String, timeout_seconds: f64 },
}

/// Errors surfaced by the inputs orchestrator.
#[derive(Debug, Error)]
pub enum InputsError {
    #[error(transparent)]
    ConfigFetch(#[from] ConfigFetchError),

    #[error("Blocking queue load failed: {0}")]
    Queue(#[source] BrokerError),

    #[error("Could not resolve {key}: {source}")]
    Resolution {
        key: String,
        #[source]
        source: BrokerError,
    },

    #[error("{key} is required but was not supplied")]
    MissingKey { key: String },

    #[error("Command line rejected: {reason}")]
    CommandLine { reason: String },

    #[error("{flag} is enabled but no {collaborator} was supplied")]
    MissingCollaborator {
        flag: String,
        collaborator: &'static str,
    },

    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },

    #[error(transparent)]
    Source(#[from] SourceError),
}
