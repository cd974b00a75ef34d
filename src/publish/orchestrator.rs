// ABOUTME: Batch orchestrator: validate, snapshot, publish each item, aggregate.
// ABOUTME: Strictly sequential; one item's failure records an outcome and the loop continues.

use std::collections::HashMap;
use std::sync::Arc;

use crate::diagnostics::{Diagnostics, Warning};
use crate::platform::{
    ApiErrorKind, TemplatePayload, TemplateStore, UpsertOutcome, upsert_by_name,
};
use crate::types::{ContentItem, DeploymentId, ExternalId, ItemId, JourneyId};
use crate::validate::{ValidationResult, Validator};

use super::deployment::{Deployment, DeploymentItem, DeploymentStatus, ItemStatus, RollbackSnapshot};
use super::error::PublishError;
use super::lock::JourneyLock;
use super::rollback::{self, RollbackReport};
use super::tracker::{ItemUpdate, Tracker};

/// Progress notification, fired before and after each item.
#[derive(Debug, Clone)]
pub struct ItemProgress {
    /// 1-based position within the batch.
    pub current: usize,
    pub total: usize,
    pub item_name: String,
    /// `Pending` before the attempt, the recorded outcome after.
    pub status: ItemStatus,
}

/// Observability hook; has no effect on control flow.
pub type ProgressCallback = Box<dyn Fn(&ItemProgress) + Send + Sync>;

/// Options for one batch publish.
#[derive(Default)]
pub struct PublishOptions {
    pub skip_validation: bool,
    /// Full control flow, zero external mutation; items end up skipped.
    pub dry_run: bool,
    /// Break a live journey lock held by someone else.
    pub force: bool,
    pub on_progress: Option<ProgressCallback>,
}

/// What a batch publish returned to the caller.
///
/// Item-level failures are reported here, never raised: `success` is simply
/// `failed == 0`.
#[derive(Debug)]
pub struct PublishReport {
    pub success: bool,
    pub deployment_id: DeploymentId,
    pub total: usize,
    pub published: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Present when validation aborted the batch.
    pub validation: Option<ValidationResult>,
    pub items: Vec<DeploymentItem>,
    /// Non-fatal findings (snapshot capture failures and the like).
    pub warnings: Vec<Warning>,
}

/// Publishes journey batches to the external platform.
///
/// Explicitly constructed from its collaborators; holds no global state.
/// One publisher may serve many journeys; per-journey locking keeps
/// concurrent batches for the same journey out of each other's way.
pub struct Publisher {
    store: Arc<dyn TemplateStore>,
    tracker: Arc<Tracker>,
    validator: Validator,
}

impl Publisher {
    pub fn new(store: Arc<dyn TemplateStore>, tracker: Arc<Tracker>) -> Self {
        Self {
            store,
            tracker,
            validator: Validator::new(),
        }
    }

    /// Replace the default validator (custom rules, custom spam phrases).
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Publish a batch of items for a journey.
    ///
    /// Sequence: create the deployment record, validate (unless skipped),
    /// capture rollback snapshots (unless dry run), publish each item in
    /// input order, then aggregate. The deployment record exists even for a
    /// validation-aborted batch, so every attempt is inspectable afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error only for batch-level preconditions: the journey lock
    /// is held, or the tracker cannot persist a transition. Validation
    /// failures and per-item publish failures come back in the report.
    pub async fn batch_publish(
        &self,
        journey_id: &JourneyId,
        items: &[ContentItem],
        options: PublishOptions,
    ) -> Result<PublishReport, PublishError> {
        let _lock = JourneyLock::acquire(self.tracker.root(), journey_id, options.force)?;
        let mut diag = Diagnostics::default();

        tracing::info!(journey = %journey_id, items = items.len(), dry_run = options.dry_run, "starting batch publish");

        // The record is created before validation so aborted batches leave a trace.
        let mut deployment = self.tracker.create(journey_id, items)?;

        if !options.skip_validation {
            let validation = self.validator.validate_batch(items);
            if !validation.is_valid {
                tracing::info!(
                    deployment = %deployment.id,
                    errors = validation.errors.len(),
                    "validation failed, aborting before any network call"
                );
                deployment.status = DeploymentStatus::Failed;
                deployment.validation_errors = Some(validation.errors.clone());
                self.tracker.save(&deployment)?;

                return Ok(PublishReport {
                    success: false,
                    deployment_id: deployment.id,
                    total: items.len(),
                    published: 0,
                    failed: 0,
                    skipped: 0,
                    validation: Some(validation),
                    items: deployment.items,
                    warnings: diag.into_warnings(),
                });
            }
        }

        let mut known_ids = HashMap::new();
        if !options.dry_run {
            let snapshots;
            (snapshots, known_ids) = self.capture_snapshots(journey_id, items, &mut diag).await;
            deployment.previous_version = Some(snapshots);
            self.tracker.save(&deployment)?;
        }

        let total = items.len();
        for (index, item) in items.iter().enumerate() {
            let current = index + 1;
            notify(&options.on_progress, current, total, item, ItemStatus::Pending);

            let (status, update) = if options.dry_run {
                (ItemStatus::Skipped, ItemUpdate::default())
            } else {
                self.publish_item(item, known_ids.get(&item.id)).await
            };

            // Incremental persistence: the record reflects every outcome as
            // soon as it is known, so a crash mid-batch loses nothing.
            deployment = self
                .tracker
                .update_item_status(&deployment.id, &item.id, status, update)?;

            notify(&options.on_progress, current, total, item, status);
        }

        deployment.recheck_completion();
        let summary = deployment.compute_summary();
        deployment.summary = Some(summary);
        self.tracker.save(&deployment)?;

        tracing::info!(
            deployment = %deployment.id,
            published = summary.published,
            failed = summary.failed,
            skipped = summary.skipped,
            "batch publish finished"
        );

        Ok(PublishReport {
            success: summary.failed == 0,
            deployment_id: deployment.id,
            total: summary.total,
            published: summary.published,
            failed: summary.failed,
            skipped: summary.skipped,
            validation: None,
            items: deployment.items,
            warnings: diag.into_warnings(),
        })
    }

    /// Attempt one item's upsert; never raises, always an outcome.
    async fn publish_item(
        &self,
        item: &ContentItem,
        known_id: Option<&ExternalId>,
    ) -> (ItemStatus, ItemUpdate) {
        let payload = TemplatePayload::for_item(item);
        match upsert_by_name(self.store.as_ref(), known_id, &payload).await {
            Ok(UpsertOutcome {
                external_id,
                action,
            }) => {
                tracing::debug!(item = %item.id, %external_id, ?action, "item published");
                (
                    ItemStatus::Published,
                    ItemUpdate {
                        external_id: Some(external_id),
                        action: Some(action),
                        error: None,
                    },
                )
            }
            Err(e) => {
                tracing::warn!(item = %item.id, error = %e, "item publish failed");
                (
                    ItemStatus::Failed,
                    ItemUpdate {
                        error: Some(e.to_string()),
                        ..Default::default()
                    },
                )
            }
        }
    }

    /// Capture prior platform state per item, best effort.
    ///
    /// Also resolves the external id each item should publish against:
    /// explicit id on the item, then the id recorded by an earlier
    /// deployment, then an exact name match. Failures here are non-fatal;
    /// the affected item just cannot be rolled back later.
    async fn capture_snapshots(
        &self,
        journey_id: &JourneyId,
        items: &[ContentItem],
        diag: &mut Diagnostics,
    ) -> (Vec<RollbackSnapshot>, HashMap<ItemId, ExternalId>) {
        let mut snapshots = Vec::new();
        let mut known_ids = HashMap::new();
        // One listing serves every name lookup in the batch. Fetched lazily:
        // a batch where every item has a recorded id never lists at all.
        let mut listing: Option<Vec<crate::platform::TemplateRecord>> = None;

        for item in items {
            let recorded = match &item.external_id {
                Some(id) => Some(id.clone()),
                None => match self.tracker.last_external_id(journey_id, &item.id) {
                    Ok(found) => found,
                    Err(e) => {
                        diag.warn(Warning::history_lookup(format!(
                            "could not consult deployment history for '{}': {e}",
                            item.name
                        )));
                        None
                    }
                },
            };

            if let Some(id) = recorded {
                match self.store.get_template(&id).await {
                    Ok(record) => {
                        known_ids.insert(item.id.clone(), record.id.clone());
                        snapshots.push(RollbackSnapshot {
                            item_id: item.id.clone(),
                            external_id: record.id,
                            prior_content: record.content,
                        });
                    }
                    Err(e) if e.kind() == ApiErrorKind::NotFound => {
                        // Record deleted out-of-band; publish will create anew.
                        tracing::debug!(item = %item.id, external_id = %id, "recorded template gone, no snapshot");
                    }
                    Err(e) => {
                        // Keep the id for publishing, just without a snapshot.
                        known_ids.insert(item.id.clone(), id.clone());
                        diag.warn(Warning::snapshot_failed(format!(
                            "could not snapshot '{}' ({id}): {e}",
                            item.name
                        )));
                    }
                }
                continue;
            }

            if listing.is_none() {
                listing = match self.store.list_templates().await {
                    Ok(records) => Some(records),
                    Err(e) => {
                        diag.warn(Warning::snapshot_failed(format!(
                            "could not list existing templates: {e}"
                        )));
                        Some(Vec::new())
                    }
                };
            }

            if let Some(record) = listing
                .as_ref()
                .and_then(|records| records.iter().find(|r| r.content.name == item.name))
            {
                known_ids.insert(item.id.clone(), record.id.clone());
                snapshots.push(RollbackSnapshot {
                    item_id: item.id.clone(),
                    external_id: record.id.clone(),
                    prior_content: record.content.clone(),
                });
            }
        }

        (snapshots, known_ids)
    }

    /// Roll a deployment back to its captured prior state.
    ///
    /// # Errors
    ///
    /// Fails fast when the deployment does not exist, was already rolled
    /// back, or captured no snapshots. Per-snapshot restore failures are
    /// counted in the report instead.
    pub async fn rollback(
        &self,
        deployment_id: &DeploymentId,
        force: bool,
    ) -> Result<RollbackReport, PublishError> {
        let deployment = self
            .tracker
            .load(deployment_id)?
            .ok_or_else(|| PublishError::DeploymentNotFound(deployment_id.clone()))?;

        let _lock = JourneyLock::acquire(self.tracker.root(), &deployment.journey_id, force)?;

        rollback::run(self.store.as_ref(), &self.tracker, deployment).await
    }

    /// Fetch a deployment record.
    pub fn get_status(&self, deployment_id: &DeploymentId) -> Result<Deployment, PublishError> {
        self.tracker
            .load(deployment_id)?
            .ok_or_else(|| PublishError::DeploymentNotFound(deployment_id.clone()))
    }

    /// All deployments, optionally for one journey, newest first.
    pub fn list_deployments(
        &self,
        journey_id: Option<&JourneyId>,
    ) -> Result<Vec<Deployment>, PublishError> {
        Ok(self.tracker.list(journey_id)?)
    }
}

fn notify(
    callback: &Option<ProgressCallback>,
    current: usize,
    total: usize,
    item: &ContentItem,
    status: ItemStatus,
) {
    if let Some(callback) = callback {
        callback(&ItemProgress {
            current,
            total,
            item_name: item.name.clone(),
            status,
        });
    }
}
