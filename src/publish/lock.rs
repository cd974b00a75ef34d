// ABOUTME: Advisory per-journey lock to prevent concurrent batches racing on the same records.
// ABOUTME: Atomic file creation in the state dir, with holder info and stale-lock breaking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::JourneyId;

use super::error::PublishError;

/// Subdirectory of the state root holding lock files.
const LOCKS_DIR: &str = "locks";

/// Information about who holds a journey lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// Journey being published or rolled back.
    pub journey: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(journey: &JourneyId) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            journey: journey.to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }
}

/// A held journey lock. Released on drop, so early returns via `?` and
/// validation aborts give the lock back too.
#[derive(Debug)]
pub struct JourneyLock {
    path: PathBuf,
}

impl JourneyLock {
    /// Acquire the lock for a journey.
    ///
    /// Uses `create_new` for atomic create-if-absent (no TOCTOU race).
    /// Stale locks (>1 hour) are auto-broken with a warning; `force` breaks
    /// any lock.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::LockHeld` when another process holds a live
    /// lock, `PublishError::Lock` on filesystem failures.
    pub fn acquire(
        state_dir: &Path,
        journey: &JourneyId,
        force: bool,
    ) -> Result<Self, PublishError> {
        let dir = state_dir.join(LOCKS_DIR);
        fs::create_dir_all(&dir)
            .map_err(|e| PublishError::Lock(format!("failed to create lock directory: {e}")))?;

        let path = dir.join(format!("{journey}.lock"));
        match Self::try_create(&path, journey) {
            Ok(lock) => return Ok(lock),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(PublishError::Lock(format!("failed to acquire lock: {e}"))),
        }

        if !Self::should_break(&path, journey, force)? {
            return match Self::read_info(&path) {
                Some(existing) => Err(PublishError::LockHeld {
                    journey: journey.to_string(),
                    holder: existing.holder,
                    pid: existing.pid,
                    started_at: existing.started_at,
                }),
                None => Err(PublishError::Lock(
                    "lock held by another process".to_string(),
                )),
            };
        }

        // Break the lock and retry once.
        tracing::debug!(path = %path.display(), "removing stale/forced lock");
        let _ = fs::remove_file(&path);

        Self::try_create(&path, journey).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                PublishError::Lock("lock acquired by another process during break".to_string())
            } else {
                PublishError::Lock(format!("failed to acquire lock: {e}"))
            }
        })
    }

    fn try_create(path: &Path, journey: &JourneyId) -> io::Result<Self> {
        let info = LockInfo::new(journey);
        let json = serde_json::to_string(&info)
            .map_err(|e| io::Error::other(format!("failed to serialize lock info: {e}")))?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        io::Write::write_all(&mut file, json.as_bytes())?;

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn read_info(path: &Path) -> Option<LockInfo> {
        let bytes = fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Check if an existing lock should be broken (stale, forced, or corrupted).
    fn should_break(path: &Path, journey: &JourneyId, force: bool) -> Result<bool, PublishError> {
        match Self::read_info(path) {
            Some(existing) => {
                if force {
                    tracing::warn!(
                        journey = %journey,
                        holder = %existing.holder,
                        pid = existing.pid,
                        "breaking lock by request"
                    );
                    Ok(true)
                } else if existing.is_stale() {
                    tracing::warn!(
                        journey = %journey,
                        holder = %existing.holder,
                        pid = existing.pid,
                        since = %existing.started_at,
                        "auto-breaking stale lock"
                    );
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            None => {
                // Lock info unreadable or corrupted, break it.
                tracing::warn!(path = %path.display(), "lock info unreadable, breaking lock");
                Ok(true)
            }
        }
    }
}

impl Drop for JourneyLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release journey lock");
        }
    }
}
