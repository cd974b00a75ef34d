// ABOUTME: Diagnostics accumulator for non-fatal warnings during publish runs.
// ABOUTME: Collects warnings that shouldn't fail a batch but should be shown to users.

/// Collects non-fatal warnings during publish and rollback operations.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A rollback snapshot could not be captured; rollback for that item
    /// won't be possible later.
    pub fn snapshot_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SnapshotFailed,
            message: message.into(),
        }
    }

    /// Deployment history could not be consulted for a recorded external id.
    pub fn history_lookup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::HistoryLookup,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    SnapshotFailed,
    HistoryLookup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_warnings_in_order() {
        let mut diag = Diagnostics::default();
        assert!(!diag.has_warnings());

        diag.warn(Warning::snapshot_failed("no snapshot for item-1"));
        diag.warn(Warning::history_lookup("history unreadable"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
        assert_eq!(diag.warnings()[0].kind, WarningKind::SnapshotFailed);
    }
}
