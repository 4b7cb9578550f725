//! Error types for pidmint-registry

use thiserror::Error;

use pidmint_core::{PersistError, RecordError, ResolutionError};

/// Result type alias for registration runs
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Transport-level failure, after the bounded retries are spent.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Every attempt failed at the transport level
    #[error("transport gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },

    /// Shutdown was requested while waiting to retry
    #[error("run cancelled while waiting to retry")]
    Cancelled,
}

/// Schema transform failure. Fatal; no network calls are made.
#[derive(Debug, Clone, Error)]
#[error("schema transform failed: {message}")]
pub struct TransformError {
    pub message: String,
}

/// Main error type for registration runs
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Template engine failure during field extraction
    #[error("field resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Record could not be serialized for transformation
    #[error("record assembly failed: {0}")]
    Record(#[from] RecordError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The registry answered with a non-accepting status; the response body
    /// is the diagnostic detail
    #[error("registry rejected {operation} of {pid} (status {status}): {body}")]
    Rejected {
        operation: &'static str,
        pid: String,
        status: u16,
        body: String,
    },

    /// Identifier write-back into the document store failed
    #[error("identifier write-back failed: {0}")]
    Persist(#[from] PersistError),

    /// Debug snapshot could not be written
    #[error("failed to write debug snapshot: {0}")]
    Snapshot(String),
}
