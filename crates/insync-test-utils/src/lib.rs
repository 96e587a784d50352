//! Testing utilities for InSync workspace
//!
//! Shared fakes, fixtures, and a harness wiring them into an editing session.

#![allow(missing_docs)]

use async_trait::async_trait;
use insync_client::{RemoteError, ScenarioStore, ServerReply, StepsTarget};
use insync_editor::{
    EditorConfig, EditorSession, Navigator, Notification, Notifier, SessionDeps, StaticIdentity,
    TextBuffer,
};
use insync_model::{is_valid_json, ProjectId, Scenario, ScenarioId, UserId};
use insync_storage::{KeyValueStorage, MemoryStorage, DRAFT_KEY, SELECTED_PROJECT_KEY};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub fn scenario_id(raw: &str) -> ScenarioId {
    ScenarioId::new(raw).unwrap()
}

pub fn project_id(raw: &str) -> ProjectId {
    ProjectId::new(raw).unwrap()
}

pub fn create_test_scenario(id: &str, project: &str) -> Scenario {
    Scenario::new(scenario_id(id), project_id(project), format!("Scenario {id}"))
        .with_author("user_1", "Test Author")
}

/// Store operation, for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Fetch,
    Rename,
    Delete,
    UpdateWeb,
    UpdateAndroid,
}

/// A call received by [`FakeStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch(ScenarioId),
    Rename(ScenarioId, String),
    Delete(ScenarioId),
    UpdateSteps(ScenarioId, StepsTarget, Option<String>),
}

/// In-memory scenario store
#[derive(Debug, Default)]
pub struct FakeStore {
    scenarios: Mutex<HashMap<ScenarioId, Scenario>>,
    failures: Mutex<HashMap<StoreOp, RemoteError>>,
    replies: Mutex<HashMap<StoreOp, ServerReply>>,
    calls: Mutex<Vec<StoreCall>>,
    validate_payloads: bool,
    fetch_gate: Option<Arc<Notify>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scenario(self, scenario: Scenario) -> Self {
        self.insert(scenario);
        self
    }

    /// Reject step updates whose payload is not JSON, like the real API
    pub fn with_payload_validation(mut self) -> Self {
        self.validate_payloads = true;
        self
    }

    /// Hold every fetch until `gate` is notified
    pub fn with_fetch_gate(mut self, gate: Arc<Notify>) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    pub fn insert(&self, scenario: Scenario) {
        self.scenarios.lock().insert(scenario.id.clone(), scenario);
    }

    pub fn get(&self, id: &ScenarioId) -> Option<Scenario> {
        self.scenarios.lock().get(id).cloned()
    }

    /// Make every call of `op` fail with `err`
    pub fn fail(&self, op: StoreOp, err: RemoteError) {
        self.failures.lock().insert(op, err);
    }

    /// Answer successful calls of `op` with `reply` instead of the default
    pub fn reply_with(&self, op: StoreOp, reply: ServerReply) {
        self.replies.lock().insert(op, reply);
    }

    fn reply(&self, op: StoreOp, default: &str) -> ServerReply {
        self.replies
            .lock()
            .get(&op)
            .cloned()
            .unwrap_or_else(|| ServerReply::new(default))
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, op: StoreOp, call: StoreCall) -> Result<(), RemoteError> {
        self.calls.lock().push(call);
        match self.failures.lock().get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> RemoteError {
        RemoteError::rejected(404, Some("Scenario not found".to_string()))
    }
}

#[async_trait]
impl ScenarioStore for FakeStore {
    async fn fetch_scenario(&self, id: &ScenarioId) -> Result<Scenario, RemoteError> {
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        self.record(StoreOp::Fetch, StoreCall::Fetch(id.clone()))?;
        self.get(id).ok_or_else(Self::not_found)
    }

    async fn rename_scenario(
        &self,
        id: &ScenarioId,
        new_title: &str,
    ) -> Result<ServerReply, RemoteError> {
        self.record(
            StoreOp::Rename,
            StoreCall::Rename(id.clone(), new_title.to_string()),
        )?;
        let mut scenarios = self.scenarios.lock();
        let scenario = scenarios.get_mut(id).ok_or_else(Self::not_found)?;
        scenario.title = new_title.to_string();
        Ok(self.reply(StoreOp::Rename, "Scenario renamed successfully."))
    }

    async fn delete_scenario(&self, id: &ScenarioId) -> Result<ServerReply, RemoteError> {
        self.record(StoreOp::Delete, StoreCall::Delete(id.clone()))?;
        let removed = self.scenarios.lock().remove(id);
        removed
            .map(|_| self.reply(StoreOp::Delete, "Scenario deleted successfully."))
            .ok_or_else(Self::not_found)
    }

    async fn update_steps(
        &self,
        id: &ScenarioId,
        target: StepsTarget,
        steps: Option<&str>,
    ) -> Result<(), RemoteError> {
        let op = match target {
            StepsTarget::Web => StoreOp::UpdateWeb,
            StepsTarget::Android => StoreOp::UpdateAndroid,
        };
        self.record(
            op,
            StoreCall::UpdateSteps(id.clone(), target, steps.map(str::to_string)),
        )?;

        if self.validate_payloads && steps.is_some_and(|s| !is_valid_json(s)) {
            return Err(RemoteError::rejected(400, Some("Invalid JSON".to_string())));
        }

        let mut scenarios = self.scenarios.lock();
        let scenario = scenarios.get_mut(id).ok_or_else(Self::not_found)?;
        let slot = match target {
            StepsTarget::Web => &mut scenario.steps_web,
            StepsTarget::Android => &mut scenario.steps_android,
        };
        *slot = steps.map(str::to_string);
        Ok(())
    }
}

/// Notifier that keeps every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().push(notification);
    }
}

/// Navigator that counts back-navigations
#[derive(Debug, Default)]
pub struct CountingNavigator {
    backs: AtomicUsize,
}

impl CountingNavigator {
    pub fn back_count(&self) -> usize {
        self.backs.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn navigate_back(&self) {
        self.backs.fetch_add(1, Ordering::SeqCst);
    }
}

/// All fakes wired for one session
#[derive(Debug, Clone)]
pub struct Harness {
    pub store: Arc<FakeStore>,
    pub storage: Arc<MemoryStorage>,
    pub identity: Arc<StaticIdentity>,
    pub surface: TextBuffer,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<CountingNavigator>,
}

impl Harness {
    /// Signed-in harness around `store`
    pub fn new(store: FakeStore) -> Self {
        Self {
            store: Arc::new(store),
            storage: Arc::new(MemoryStorage::new()),
            identity: Arc::new(StaticIdentity::signed_in(UserId::new("user_1").unwrap())),
            surface: TextBuffer::default(),
            notifier: Arc::new(RecordingNotifier::default()),
            navigator: Arc::new(CountingNavigator::default()),
        }
    }

    pub fn with_identity(mut self, identity: StaticIdentity) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn select_project(&self, project: &str) {
        self.storage.set(SELECTED_PROJECT_KEY, project).unwrap();
    }

    pub fn set_draft(&self, draft: &str) {
        self.storage.set(DRAFT_KEY, draft).unwrap();
    }

    pub fn draft(&self) -> Option<String> {
        self.storage.get(DRAFT_KEY).unwrap()
    }

    pub fn deps(&self) -> SessionDeps {
        SessionDeps {
            store: self.store.clone(),
            storage: self.storage.clone(),
            identity: self.identity.clone(),
            surface: Arc::new(self.surface.clone()),
            notifier: self.notifier.clone(),
            navigator: self.navigator.clone(),
        }
    }

    pub fn session(&self) -> EditorSession {
        EditorSession::new(EditorConfig::default(), self.deps())
    }
}
