// ABOUTME: Durable deployment tracker: one JSON document per deployment on disk.
// ABOUTME: Writes are atomic (temp-then-rename) and serialized per deployment id.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::platform::UpsertAction;
use crate::types::{ContentItem, DeploymentId, ExternalId, ItemId, JourneyId};

use super::deployment::{Deployment, ItemStatus};

/// Subdirectory of the state root holding deployment records.
const DEPLOYMENTS_DIR: &str = "deployments";

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt deployment record at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode deployment record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("deployment not found: {0}")]
    DeploymentNotFound(DeploymentId),

    #[error("item {item} not found in deployment {deployment}")]
    ItemNotFound {
        deployment: DeploymentId,
        item: ItemId,
    },

    #[error("cannot determine state directory: HOME is not set")]
    NoHome,
}

/// Optional fields attached to an item transition.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub external_id: Option<ExternalId>,
    pub action: Option<UpsertAction>,
    pub error: Option<String>,
}

/// Durable store of deployment records.
///
/// Layout: `<root>/deployments/<deployment-id>.json`, one self-contained
/// document per deployment. The journey id lives inside the record, so
/// listing by journey is a filter, not a join.
pub struct Tracker {
    root: PathBuf,
    // Serializes writers per deployment id so concurrent journeys can't
    // interleave a read-modify-write on the same record.
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Tracker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Default state root, `$HOME/.local/state/barua` (XDG-ish, like a CLI should).
    pub fn default_root() -> Result<PathBuf, TrackerError> {
        let home = std::env::var_os("HOME").ok_or(TrackerError::NoHome)?;
        Ok(PathBuf::from(home).join(".local/state/barua"))
    }

    /// State root this tracker writes under. Lock files live here too.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn deployments_dir(&self) -> PathBuf {
        self.root.join(DEPLOYMENTS_DIR)
    }

    fn record_path(&self, id: &DeploymentId) -> PathBuf {
        self.deployments_dir().join(format!("{id}.json"))
    }

    fn lock_for(&self, id: &DeploymentId) -> Arc<Mutex<()>> {
        let mut locks = self.write_locks.lock();
        locks
            .entry(id.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Create and persist a fresh in-progress deployment with pending items.
    pub fn create(
        &self,
        journey_id: &JourneyId,
        items: &[ContentItem],
    ) -> Result<Deployment, TrackerError> {
        let deployment = Deployment::new(journey_id.clone(), items);
        self.save(&deployment)?;
        Ok(deployment)
    }

    /// Atomically overwrite the full record: write a temp file, then rename.
    /// A crash mid-write leaves at worst a stray `.tmp` file, never a
    /// truncated record.
    pub fn save(&self, deployment: &Deployment) -> Result<(), TrackerError> {
        let dir = self.deployments_dir();
        fs::create_dir_all(&dir).map_err(|source| TrackerError::Io {
            path: dir.clone(),
            source,
        })?;

        let json = serde_json::to_vec_pretty(deployment).map_err(TrackerError::Encode)?;

        let path = self.record_path(&deployment.id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|source| TrackerError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| TrackerError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(deployment = %deployment.id, status = ?deployment.status, "saved deployment record");
        Ok(())
    }

    /// Load a deployment by id. `Ok(None)` when no record exists.
    pub fn load(&self, id: &DeploymentId) -> Result<Option<Deployment>, TrackerError> {
        let path = self.record_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(TrackerError::Io { path, source }),
        };
        let deployment =
            serde_json::from_slice(&bytes).map_err(|source| TrackerError::Corrupt { path, source })?;
        Ok(Some(deployment))
    }

    /// Transition one item and persist the whole record.
    ///
    /// This is the single point of truth for the completion rule: after the
    /// item mutation, a deployment whose items are all terminal moves to its
    /// terminal status and gets `completed_at` stamped.
    pub fn update_item_status(
        &self,
        deployment_id: &DeploymentId,
        item_id: &ItemId,
        status: ItemStatus,
        update: ItemUpdate,
    ) -> Result<Deployment, TrackerError> {
        let lock = self.lock_for(deployment_id);
        let _guard = lock.lock();

        let mut deployment = self
            .load(deployment_id)?
            .ok_or_else(|| TrackerError::DeploymentNotFound(deployment_id.clone()))?;

        {
            let item = deployment
                .item_mut(item_id)
                .ok_or_else(|| TrackerError::ItemNotFound {
                    deployment: deployment_id.clone(),
                    item: item_id.clone(),
                })?;
            item.status = status;
            if update.external_id.is_some() {
                item.external_id = update.external_id;
            }
            if update.action.is_some() {
                item.action = update.action;
            }
            item.error = update.error;
        }

        deployment.recheck_completion();
        self.save(&deployment)?;
        Ok(deployment)
    }

    /// All deployments, optionally filtered by journey, newest first.
    ///
    /// Unreadable records are skipped with a warning rather than failing the
    /// whole listing.
    pub fn list(&self, journey_id: Option<&JourneyId>) -> Result<Vec<Deployment>, TrackerError> {
        let dir = self.deployments_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(TrackerError::Io { path: dir, source }),
        };

        let mut deployments = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TrackerError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable deployment record");
                    continue;
                }
            };
            match serde_json::from_slice::<Deployment>(&bytes) {
                Ok(dep) => {
                    if journey_id.is_none_or(|j| &dep.journey_id == j) {
                        deployments.push(dep);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping corrupt deployment record");
                }
            }
        }

        // Deployment ids are time-ordered, so id order is creation order.
        deployments.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(deployments)
    }

    /// The most recently recorded external id for an item of this journey.
    ///
    /// Scans history newest first for a published (or restored) entry. Lets
    /// the orchestrator prefer id-based upserts over ambiguous name matching.
    pub fn last_external_id(
        &self,
        journey_id: &JourneyId,
        item_id: &ItemId,
    ) -> Result<Option<ExternalId>, TrackerError> {
        for deployment in self.list(Some(journey_id))? {
            let found = deployment.items.iter().find_map(|item| {
                (&item.id == item_id
                    && matches!(item.status, ItemStatus::Published | ItemStatus::Restored))
                .then(|| item.external_id.clone())
                .flatten()
            });
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::deployment::DeploymentStatus;
    use crate::types::ItemKind;

    fn items(n: usize) -> Vec<ContentItem> {
        (0..n)
            .map(|i| ContentItem {
                id: ItemId::new(format!("i{i}")),
                name: format!("item-{i}"),
                kind: ItemKind::Email,
                subject: Some("Hi".to_string()),
                body: Some("Body".to_string()),
                message: None,
                external_id: None,
            })
            .collect()
    }

    fn journey() -> JourneyId {
        JourneyId::new("welcome").unwrap()
    }

    #[test]
    fn create_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());

        let created = tracker.create(&journey(), &items(2)).unwrap();
        let loaded = tracker.load(&created.id).unwrap().unwrap();
        assert_eq!(created, loaded);
    }

    #[test]
    fn load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());
        assert!(tracker.load(&DeploymentId::new("dep-nope")).unwrap().is_none());
    }

    #[test]
    fn update_item_status_persists_and_completes() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());
        let dep = tracker.create(&journey(), &items(2)).unwrap();

        let after_first = tracker
            .update_item_status(
                &dep.id,
                &ItemId::new("i0"),
                ItemStatus::Published,
                ItemUpdate {
                    external_id: Some(ExternalId::new("t1")),
                    action: None,
                    error: None,
                },
            )
            .unwrap();
        assert_eq!(after_first.status, DeploymentStatus::InProgress);

        let after_second = tracker
            .update_item_status(
                &dep.id,
                &ItemId::new("i1"),
                ItemStatus::Failed,
                ItemUpdate {
                    error: Some("boom".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(after_second.status, DeploymentStatus::Partial);
        assert!(after_second.completed_at.is_some());

        // The persisted record matches the returned one.
        let loaded = tracker.load(&dep.id).unwrap().unwrap();
        assert_eq!(loaded, after_second);
    }

    #[test]
    fn update_unknown_item_errors() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());
        let dep = tracker.create(&journey(), &items(1)).unwrap();

        let err = tracker
            .update_item_status(
                &dep.id,
                &ItemId::new("missing"),
                ItemStatus::Published,
                ItemUpdate::default(),
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::ItemNotFound { .. }));
    }

    #[test]
    fn list_is_newest_first_and_filters_by_journey() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());
        let other = JourneyId::new("onboarding").unwrap();

        let a = tracker.create(&journey(), &items(1)).unwrap();
        let b = tracker.create(&journey(), &items(1)).unwrap();
        let _c = tracker.create(&other, &items(1)).unwrap();

        let all = tracker.list(None).unwrap();
        assert_eq!(all.len(), 3);

        let welcome = tracker.list(Some(&journey())).unwrap();
        assert_eq!(welcome.len(), 2);
        assert_eq!(welcome[0].id, b.id);
        assert_eq!(welcome[1].id, a.id);
    }

    #[test]
    fn list_skips_corrupt_records() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());
        tracker.create(&journey(), &items(1)).unwrap();

        fs::write(dir.path().join("deployments/garbage.json"), b"{not json").unwrap();

        assert_eq!(tracker.list(None).unwrap().len(), 1);
    }

    #[test]
    fn last_external_id_prefers_newest_published() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());
        let dep_old = tracker.create(&journey(), &items(1)).unwrap();
        tracker
            .update_item_status(
                &dep_old.id,
                &ItemId::new("i0"),
                ItemStatus::Published,
                ItemUpdate {
                    external_id: Some(ExternalId::new("old")),
                    ..Default::default()
                },
            )
            .unwrap();

        let dep_new = tracker.create(&journey(), &items(1)).unwrap();
        tracker
            .update_item_status(
                &dep_new.id,
                &ItemId::new("i0"),
                ItemStatus::Published,
                ItemUpdate {
                    external_id: Some(ExternalId::new("new")),
                    ..Default::default()
                },
            )
            .unwrap();

        let found = tracker.last_external_id(&journey(), &ItemId::new("i0")).unwrap();
        assert_eq!(found, Some(ExternalId::new("new")));

        let missing = tracker.last_external_id(&journey(), &ItemId::new("i9")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn failed_items_do_not_provide_external_ids() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::new(dir.path());
        let dep = tracker.create(&journey(), &items(1)).unwrap();
        tracker
            .update_item_status(
                &dep.id,
                &ItemId::new("i0"),
                ItemStatus::Failed,
                ItemUpdate {
                    error: Some("nope".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(tracker
            .last_external_id(&journey(), &ItemId::new("i0"))
            .unwrap()
            .is_none());
    }
}
