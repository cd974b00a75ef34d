// ABOUTME: Rollback manager: replays a deployment's snapshots back to the platform.
// ABOUTME: One-shot, irreversible; per-snapshot failures are counted, not raised.

use chrono::Utc;

use crate::platform::TemplateStore;
use crate::types::DeploymentId;

use super::deployment::{Deployment, DeploymentStatus, ItemStatus, RollbackItemResult};
use super::error::PublishError;
use super::tracker::Tracker;

/// What a rollback returned to the caller.
#[derive(Debug, Clone)]
pub struct RollbackReport {
    pub success: bool,
    pub deployment_id: DeploymentId,
    pub restored: usize,
    pub failed: usize,
    pub items: Vec<RollbackItemResult>,
}

/// Restore every snapshot of `deployment` through the store.
///
/// Each snapshot's prior content is written back with an id-based update;
/// one item's failure does not block the rest. On completion the deployment
/// becomes `rolled_back` with its per-item results recorded.
///
/// # Errors
///
/// Fails fast if the deployment was already rolled back or captured no
/// snapshots. Persistence failures abort: rollback bookkeeping must stay
/// trustworthy.
pub(super) async fn run(
    store: &dyn TemplateStore,
    tracker: &Tracker,
    mut deployment: Deployment,
) -> Result<RollbackReport, PublishError> {
    if deployment.status == DeploymentStatus::RolledBack {
        return Err(PublishError::AlreadyRolledBack(deployment.id));
    }

    let snapshots = match &deployment.previous_version {
        Some(snapshots) if !snapshots.is_empty() => snapshots.clone(),
        _ => return Err(PublishError::NoRollbackData(deployment.id)),
    };

    tracing::info!(
        deployment = %deployment.id,
        snapshots = snapshots.len(),
        "rolling back deployment"
    );

    let mut results = Vec::with_capacity(snapshots.len());
    for snapshot in &snapshots {
        match store
            .update_template(&snapshot.external_id, &snapshot.prior_content)
            .await
        {
            Ok(_) => {
                tracing::debug!(item = %snapshot.item_id, external_id = %snapshot.external_id, "restored prior content");
                if let Some(item) = deployment.item_mut(&snapshot.item_id) {
                    item.status = ItemStatus::Restored;
                    item.error = None;
                }
                results.push(RollbackItemResult {
                    item_id: snapshot.item_id.clone(),
                    external_id: snapshot.external_id.clone(),
                    restored: true,
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!(item = %snapshot.item_id, error = %e, "restore failed");
                results.push(RollbackItemResult {
                    item_id: snapshot.item_id.clone(),
                    external_id: snapshot.external_id.clone(),
                    restored: false,
                    error: Some(e.to_string()),
                });
            }
        }

        // Persist progress after each snapshot so a crash mid-rollback
        // still shows which items were already restored.
        deployment.rollback_results = Some(results.clone());
        tracker.save(&deployment)?;
    }

    let restored = results.iter().filter(|r| r.restored).count();
    let failed = results.len() - restored;

    deployment.status = DeploymentStatus::RolledBack;
    deployment.rolled_back_at = Some(Utc::now());
    deployment.rollback_results = Some(results.clone());
    tracker.save(&deployment)?;

    tracing::info!(
        deployment = %deployment.id,
        restored,
        failed,
        "rollback finished"
    );

    Ok(RollbackReport {
        success: failed == 0,
        deployment_id: deployment.id,
        restored,
        failed,
        items: results,
    })
}
