// ABOUTME: Deployment publishing: durable tracking, batch orchestration, rollback.
// ABOUTME: Exports the Publisher entry point and the deployment record types.

mod deployment;
mod error;
mod lock;
mod orchestrator;
mod rollback;
mod tracker;

pub use deployment::{
    Deployment, DeploymentItem, DeploymentStatus, DeploymentSummary, ItemStatus,
    RollbackItemResult, RollbackSnapshot,
};
pub use error::PublishError;
pub use lock::{JourneyLock, LockInfo};
pub use orchestrator::{ItemProgress, ProgressCallback, PublishOptions, PublishReport, Publisher};
pub use rollback::RollbackReport;
pub use tracker::{ItemUpdate, Tracker, TrackerError};
