// ABOUTME: Test support: in-memory TemplateStore fake with call logging.
// ABOUTME: Lets orchestrator and rollback tests run without a network or delays.

// Shared across test binaries; not every binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};

use barua::platform::{ExternalApiError, TemplatePayload, TemplateRecord, TemplateStore};
use barua::types::{ContentItem, ExternalId, ItemId, ItemKind};

/// In-memory template store. Records every call so tests can assert on
/// traffic (e.g. the dry-run invariant of zero calls).
#[derive(Default)]
pub struct InMemoryStore {
    records: Mutex<Vec<TemplateRecord>>,
    calls: Mutex<Vec<String>>,
    fail_names: Mutex<HashSet<String>>,
    fail_gets: Mutex<HashSet<String>>,
    fail_lists: AtomicU32,
    next_id: AtomicU32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the call log. Returns its id.
    pub fn seed(&self, payload: TemplatePayload) -> ExternalId {
        let id = self.fresh_id();
        self.records.lock().push(TemplateRecord {
            id: id.clone(),
            content: payload,
        });
        id
    }

    /// Make create/update fail with a 500 for templates with this name.
    pub fn fail_for(&self, name: &str) {
        self.fail_names.lock().insert(name.to_string());
    }

    /// Make `get_template` fail with a 500 for this id.
    pub fn fail_get_for(&self, id: &ExternalId) {
        self.fail_gets.lock().insert(id.as_str().to_string());
    }

    /// Make the next `list_templates` call fail with a 500. Stacks.
    pub fn fail_next_list(&self) {
        self.fail_lists.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove a record out-of-band (simulates deletion on the platform).
    pub fn remove(&self, id: &ExternalId) {
        self.records.lock().retain(|r| &r.id != id);
    }

    pub fn record(&self, id: &ExternalId) -> Option<TemplateRecord> {
        self.records.lock().iter().find(|r| &r.id == id).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn fresh_id(&self) -> ExternalId {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        ExternalId::new(format!("ext-{n}"))
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn induced_failure(&self, name: &str) -> Option<ExternalApiError> {
        self.fail_names.lock().contains(name).then(|| ExternalApiError::Status {
            status: 500,
            body: format!("induced failure for '{name}'"),
        })
    }
}

fn not_found(id: &ExternalId) -> ExternalApiError {
    ExternalApiError::Status {
        status: 404,
        body: format!("no template {id}"),
    }
}

#[async_trait]
impl TemplateStore for InMemoryStore {
    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, ExternalApiError> {
        self.log("list");
        if self.fail_lists.load(Ordering::Relaxed) > 0 {
            self.fail_lists.fetch_sub(1, Ordering::Relaxed);
            return Err(ExternalApiError::Status {
                status: 500,
                body: "induced list failure".to_string(),
            });
        }
        Ok(self.records.lock().clone())
    }

    async fn get_template(&self, id: &ExternalId) -> Result<TemplateRecord, ExternalApiError> {
        self.log(format!("get {id}"));
        if self.fail_gets.lock().contains(id.as_str()) {
            return Err(ExternalApiError::Status {
                status: 500,
                body: format!("induced get failure for '{id}'"),
            });
        }
        self.record(id).ok_or_else(|| not_found(id))
    }

    async fn create_template(
        &self,
        payload: &TemplatePayload,
    ) -> Result<TemplateRecord, ExternalApiError> {
        self.log(format!("create {}", payload.name));
        if let Some(err) = self.induced_failure(&payload.name) {
            return Err(err);
        }
        let record = TemplateRecord {
            id: self.fresh_id(),
            content: payload.clone(),
        };
        self.records.lock().push(record.clone());
        Ok(record)
    }

    async fn update_template(
        &self,
        id: &ExternalId,
        payload: &TemplatePayload,
    ) -> Result<TemplateRecord, ExternalApiError> {
        self.log(format!("update {id}"));
        if let Some(err) = self.induced_failure(&payload.name) {
            return Err(err);
        }
        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        record.content = payload.clone();
        Ok(record.clone())
    }

    async fn delete_template(&self, id: &ExternalId) -> Result<(), ExternalApiError> {
        self.log(format!("delete {id}"));
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}

/// A valid email item.
pub fn email_item(id: &str, name: &str, subject: &str, body: &str) -> ContentItem {
    ContentItem {
        id: ItemId::new(id),
        name: name.to_string(),
        kind: ItemKind::Email,
        subject: Some(subject.to_string()),
        body: Some(body.to_string()),
        message: None,
        external_id: None,
    }
}

/// A valid SMS item (carries an opt-out phrase).
pub fn sms_item(id: &str, name: &str, message: &str) -> ContentItem {
    ContentItem {
        id: ItemId::new(id),
        name: name.to_string(),
        kind: ItemKind::Sms,
        subject: None,
        body: None,
        message: Some(message.to_string()),
        external_id: None,
    }
}

/// Email payload helper for seeding.
pub fn email_payload(name: &str, subject: &str, body: &str) -> TemplatePayload {
    TemplatePayload {
        name: name.to_string(),
        kind: ItemKind::Email,
        subject: Some(subject.to_string()),
        body: Some(body.to_string()),
    }
}
