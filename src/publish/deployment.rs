// ABOUTME: Durable deployment record types: per-item outcomes, snapshots, summary.
// ABOUTME: Status transitions only move forward; rolled_back may follow completed or partial.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::{TemplatePayload, UpsertAction};
use crate::types::{ContentItem, DeploymentId, ExternalId, ItemId, ItemKind, JourneyId};
use crate::validate::ValidationIssue;

/// Status of a whole deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    InProgress,
    /// Every item published.
    Completed,
    /// At least one item failed, the rest were processed.
    Partial,
    /// Aborted before any network call (validation failure).
    Failed,
    /// Dry run: every item skipped, nothing touched the platform.
    DryRun,
    /// Snapshots were replayed back to the platform. Terminal, one-shot.
    RolledBack,
}

impl DeploymentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DeploymentStatus::InProgress)
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DeploymentStatus::InProgress => "in_progress",
            DeploymentStatus::Completed => "completed",
            DeploymentStatus::Partial => "partial",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::DryRun => "dry_run",
            DeploymentStatus::RolledBack => "rolled_back",
        };
        write!(f, "{s}")
    }
}

/// Status of one item within a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not yet visited by the orchestrator.
    Pending,
    Published,
    Failed,
    /// Dry run left this item untouched.
    Skipped,
    /// Rollback restored this item's prior content.
    Restored,
}

impl ItemStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ItemStatus::Pending)
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Published => "published",
            ItemStatus::Failed => "failed",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Restored => "restored",
        };
        write!(f, "{s}")
    }
}

/// One content item's publish outcome within a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentItem {
    pub id: ItemId,

    pub name: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    pub status: ItemStatus,

    /// Id assigned by the delivery platform. Set when published.
    #[serde(default)]
    pub external_id: Option<ExternalId>,

    /// Whether the publish created a new record or updated an existing one.
    #[serde(default)]
    pub action: Option<UpsertAction>,

    /// Error message. Set when failed.
    #[serde(default)]
    pub error: Option<String>,
}

impl DeploymentItem {
    fn pending(item: &ContentItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            kind: item.kind.clone(),
            status: ItemStatus::Pending,
            external_id: None,
            action: None,
            error: None,
        }
    }
}

/// Captured platform state for one item, taken before the first mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackSnapshot {
    pub item_id: ItemId,
    pub external_id: ExternalId,
    pub prior_content: TemplatePayload,
}

/// Per-item outcome of a rollback run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackItemResult {
    pub item_id: ItemId,
    pub external_id: ExternalId,
    pub restored: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Aggregate counts, computed when a deployment reaches a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub total: usize,
    pub published: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// One attempt to publish a batch of items for a journey.
///
/// Records are append-only history: they are created before any network call,
/// mutated through the tracker as items progress, and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,

    pub journey_id: JourneyId,

    pub status: DeploymentStatus,

    pub created_at: DateTime<Utc>,

    /// Stamped exactly once, when every item reaches a terminal status.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    pub items: Vec<DeploymentItem>,

    /// Prior platform state per item, for rollback. Items with no existing
    /// record produce no snapshot.
    #[serde(default)]
    pub previous_version: Option<Vec<RollbackSnapshot>>,

    #[serde(default)]
    pub summary: Option<DeploymentSummary>,

    /// Attached when validation aborts the batch.
    #[serde(default)]
    pub validation_errors: Option<Vec<ValidationIssue>>,

    #[serde(default)]
    pub rolled_back_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub rollback_results: Option<Vec<RollbackItemResult>>,
}

impl Deployment {
    pub fn new(journey_id: JourneyId, items: &[ContentItem]) -> Self {
        Self {
            id: DeploymentId::generate(),
            journey_id,
            status: DeploymentStatus::InProgress,
            created_at: Utc::now(),
            completed_at: None,
            items: items.iter().map(DeploymentItem::pending).collect(),
            previous_version: None,
            summary: None,
            validation_errors: None,
            rolled_back_at: None,
            rollback_results: None,
        }
    }

    pub fn item_mut(&mut self, item_id: &ItemId) -> Option<&mut DeploymentItem> {
        self.items.iter_mut().find(|i| &i.id == item_id)
    }

    /// Compute aggregate counts from current item statuses.
    pub fn compute_summary(&self) -> DeploymentSummary {
        let count = |status: ItemStatus| self.items.iter().filter(|i| i.status == status).count();
        DeploymentSummary {
            total: self.items.len(),
            published: count(ItemStatus::Published),
            failed: count(ItemStatus::Failed),
            skipped: count(ItemStatus::Skipped),
        }
    }

    /// Apply the completion rule after an item transition.
    ///
    /// Once every item is terminal: any failure makes the deployment
    /// `partial`; an all-skipped run (dry run) ends as `dry_run`; otherwise
    /// `completed`. `completed_at` is stamped exactly once. Deployments
    /// already past `in_progress` are left alone.
    pub(crate) fn recheck_completion(&mut self) {
        if self.status != DeploymentStatus::InProgress {
            return;
        }
        if !self.items.iter().all(|i| i.status.is_terminal()) {
            return;
        }

        let any_failed = self.items.iter().any(|i| i.status == ItemStatus::Failed);
        let all_skipped = !self.items.is_empty()
            && self.items.iter().all(|i| i.status == ItemStatus::Skipped);

        self.status = if any_failed {
            DeploymentStatus::Partial
        } else if all_skipped {
            DeploymentStatus::DryRun
        } else {
            DeploymentStatus::Completed
        };

        if self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
    }
}
