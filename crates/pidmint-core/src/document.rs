//! Host document snapshot and the identifier write-back seam

use thiserror::Error;

use crate::identifier::Pid;

/// Read-only view of the host document a run operates on.
///
/// When the work is grouped under an anchor (a multi-volume or otherwise
/// grouped work) with at least one child, `doc_type` is the first child's
/// type and `anchor_type` carries the anchor's own type; catalogue id and
/// any existing identifier are read from that child as well.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    /// Logical document type of the registered work
    pub doc_type: String,
    /// Type of the enclosing anchor, when one exists
    pub anchor_type: Option<String>,
    /// Local catalogue identifier, the stable suffix of minted identifiers
    pub catalogue_id: String,
    /// Identifier already stored in the document's metadata, if any
    pub existing_pid: Option<String>,
}

impl DocumentInfo {
    /// The persisted identifier, if the document carries a non-blank one.
    /// Presence classifies the run as an update; the value is reused
    /// verbatim and never re-minted.
    pub fn current_pid(&self) -> Option<&str> {
        self.existing_pid
            .as_deref()
            .filter(|pid| !pid.trim().is_empty())
    }
}

/// Failure writing the identifier back to the document store.
#[derive(Debug, Clone, Error)]
#[error("failed to persist identifier to the document store: {message}")]
pub struct PersistError {
    pub message: String,
}

/// Write-back seam into the host document store.
///
/// Called at most once per run, and only after every remote call of the
/// winning branch has succeeded. An identifier is never overwritten once
/// persisted.
pub trait PidStore {
    fn persist(&mut self, pid: &Pid) -> Result<(), PersistError>;
}
