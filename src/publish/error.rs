// ABOUTME: Error types for publish and rollback operations.
// ABOUTME: Only batch-level preconditions surface as errors; item failures are recorded.

use chrono::{DateTime, Utc};

use crate::types::DeploymentId;

use super::tracker::TrackerError;

/// Errors that abort a publish or rollback before (or instead of) running it.
///
/// Per-item publish failures never appear here: they are recorded on the
/// deployment and reflected in the report counts.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// No record with this id in the tracker.
    #[error("deployment not found: {0}")]
    DeploymentNotFound(DeploymentId),

    /// Rollback requested but the deployment captured no snapshots.
    #[error("deployment {0} has no rollback snapshots")]
    NoRollbackData(DeploymentId),

    /// Rollback is one-shot; a rolled-back deployment stays rolled back.
    #[error("deployment {0} was already rolled back")]
    AlreadyRolledBack(DeploymentId),

    /// Another process holds the journey lock.
    #[error("journey {journey} is locked by {holder} (pid {pid}) since {started_at}")]
    LockHeld {
        journey: String,
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },

    /// Lock file handling failed for a reason other than contention.
    #[error("lock error: {0}")]
    Lock(String),

    /// The tracker could not durably record a transition. Fatal: proceeding
    /// would leave untracked external state and break rollback fidelity.
    #[error("tracker error: {0}")]
    Persistence(#[from] TrackerError),
}
