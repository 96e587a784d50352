//! Scenario editing session
//!
//! Owns one scenario's editable payloads between the local draft slot and the
//! remote store:
//! - `load` clears the draft, fetches the scenario, checks it against the
//!   selected project marker and stages validated web steps as the new draft
//! - `save` pushes the draft (web) and the live editing surface (android)
//!   concurrently and reports one combined outcome
//! - `rename` / `delete` forward to the store once identity is resolved

use crate::config::EditorConfig;
use crate::error::{EditorError, NotFoundReason};
use crate::identity::IdentityProvider;
use crate::navigation::{DelayedTask, Navigator};
use crate::notify::{Notification, Notifier};
use crate::shortcut::KeyEvent;
use crate::state::SessionState;
use crate::surface::EditingSurface;
use insync_client::{ScenarioStore, ServerReply, StepsTarget};
use insync_model::{ProjectId, Scenario, ScenarioId, StepsPayload};
use insync_storage::KeyValueStorage;
use std::sync::Arc;

/// Shown when a load fails for any reason
pub const MSG_NOT_FOUND: &str = "Scenario not found. Redirecting...";
/// Shown when both step updates succeed
pub const MSG_SAVED: &str = "Scenario saved successfully!";
/// Shown when either step update fails
pub const MSG_SAVE_FAILED: &str = "Failed to save scenario!";
/// Shown when a rename never reached the server
pub const MSG_RENAME_FAILED: &str = "Failed to rename scenario.";
/// Shown when a delete never reached the server
pub const MSG_DELETE_FAILED: &str = "Failed to delete scenario.";
/// Shown when a rename succeeded without a server message
pub const MSG_RENAMED: &str = "Scenario renamed.";
/// Shown when a delete succeeded without a server message
pub const MSG_DELETED: &str = "Scenario deleted.";

/// Collaborators an editing session talks to
#[derive(Clone)]
pub struct SessionDeps {
    /// Remote scenario store
    pub store: Arc<dyn ScenarioStore>,
    /// Local slots holding the draft and the selected project marker
    pub storage: Arc<dyn KeyValueStorage>,
    /// Signed-in user, gating rename and delete
    pub identity: Arc<dyn IdentityProvider>,
    /// Source of the android steps at save time
    pub surface: Arc<dyn EditingSurface>,
    /// Sink for user-visible messages
    pub notifier: Arc<dyn Notifier>,
    /// Back-navigation after a failed load
    pub navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for SessionDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDeps").finish_non_exhaustive()
    }
}

/// One editing session for one scenario
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    deps: SessionDeps,
    state: SessionState,
    scenario: Option<Scenario>,
    /// Raised after the server answers a rename or delete
    pending: bool,
    exit_task: Option<DelayedTask>,
}

impl EditorSession {
    /// Create a session in `Initializing`
    #[must_use]
    pub fn new(config: EditorConfig, deps: SessionDeps) -> Self {
        Self {
            config,
            deps,
            state: SessionState::Initializing,
            scenario: None,
            pending: false,
            exit_task: None,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SessionState {
        let exited = self
            .exit_task
            .as_ref()
            .is_some_and(DelayedTask::is_finished);
        if self.state == SessionState::NotFoundPendingExit && exited {
            SessionState::Exited
        } else {
            self.state
        }
    }

    /// Loaded scenario, if any
    #[inline]
    #[must_use]
    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Whether a rename or delete has been answered since the last take
    #[inline]
    #[must_use]
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Read and clear the pending flag
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Current local draft
    ///
    /// # Errors
    /// - `EditorError::Storage` if the slot cannot be read
    pub fn draft(&self) -> Result<Option<String>, EditorError> {
        Ok(self.deps.storage.get(&self.config.draft_key)?)
    }

    /// Replace the local draft, as the editor does while the user types
    ///
    /// # Errors
    /// - `EditorError::Storage` if the slot cannot be written
    pub fn set_draft(&self, steps: &str) -> Result<(), EditorError> {
        Ok(self.deps.storage.set(&self.config.draft_key, steps)?)
    }

    /// Load `id` into this session
    ///
    /// Clears the draft before fetching. On success the draft holds the
    /// scenario's web steps if they are well-formed JSON and is empty
    /// otherwise. Every failure is reported as `NotFound`, notified, and
    /// schedules back-navigation after the configured delay.
    ///
    /// # Errors
    /// - `EditorError::SessionClosed` if the session is exiting or torn down
    /// - `EditorError::NotFound` if the scenario is missing, unreachable or
    ///   belongs to another project than the selected one
    pub async fn load(&mut self, id: ScenarioId) -> Result<&Scenario, EditorError> {
        if !self.state.is_open() {
            return Err(EditorError::SessionClosed);
        }
        self.state = SessionState::Initializing;
        self.scenario = None;
        tracing::info!(scenario = %id, "loading scenario");

        match self.reconcile(&id).await {
            Ok(scenario) => {
                tracing::info!(scenario = %id, project = %scenario.project_id, "scenario loaded");
                self.state = SessionState::Loaded;
                Ok(self.scenario.insert(scenario))
            }
            Err(reason) => {
                tracing::warn!(scenario = %id, %reason, "scenario load failed");
                self.deps.notifier.notify(Notification::error(MSG_NOT_FOUND));
                self.schedule_exit();
                Err(EditorError::NotFound { id, reason })
            }
        }
    }

    async fn reconcile(&self, id: &ScenarioId) -> Result<Scenario, NotFoundReason> {
        let storage = &self.deps.storage;
        storage.remove(&self.config.draft_key)?;

        let selected = storage
            .get(&self.config.marker_key)?
            .and_then(|raw| ProjectId::new(raw).ok());

        let scenario = self.deps.store.fetch_scenario(id).await?;
        if !scenario.belongs_to(selected.as_ref()) {
            return Err(NotFoundReason::ProjectMismatch {
                selected,
                actual: scenario.project_id,
            });
        }

        match scenario.web_steps().map(StepsPayload::parse) {
            Some(Ok(steps)) => {
                storage.set(&self.config.draft_key, steps.as_str())?;
                tracing::debug!(scenario = %id, bytes = steps.as_str().len(), "draft staged");
            }
            Some(Err(e)) => {
                tracing::debug!(scenario = %id, error = %e, "web steps invalid, draft left empty");
            }
            None => {
                tracing::debug!(scenario = %id, "no web steps, draft left empty");
            }
        }

        Ok(scenario)
    }

    fn schedule_exit(&mut self) {
        self.state = SessionState::NotFoundPendingExit;
        let navigator = Arc::clone(&self.deps.navigator);
        self.exit_task = Some(DelayedTask::schedule(self.config.exit_delay(), move || {
            navigator.navigate_back();
        }));
    }

    /// Wait for scheduled back-navigation; `true` if it ran
    pub async fn wait_for_exit(&mut self) -> bool {
        let Some(task) = self.exit_task.take() else {
            return false;
        };
        let ran = task.wait().await;
        if ran {
            self.state = SessionState::Exited;
        }
        ran
    }

    /// Close the session, cancelling scheduled navigation
    pub fn teardown(&mut self) {
        if let Some(mut task) = self.exit_task.take() {
            task.cancel();
        }
        self.scenario = None;
        self.state = SessionState::TornDown;
        tracing::debug!("editing session torn down");
    }

    /// Rename `id` to `new_title`
    ///
    /// Returns `NotReady` without any network call or notification while the
    /// identity provider has no resolved user.
    ///
    /// # Errors
    /// - `EditorError::NotReady` if identity is unresolved
    /// - `EditorError::NotLoaded` if `id` is not the loaded scenario
    /// - `EditorError::EmptyTitle` if `new_title` is blank
    /// - `EditorError::RemoteWriteFailure` if the server rejected the rename
    /// - `EditorError::TransportFailure` if the server could not be reached
    pub async fn rename(
        &mut self,
        id: &ScenarioId,
        new_title: &str,
    ) -> Result<ServerReply, EditorError> {
        self.ensure_ready(id)?;
        if new_title.trim().is_empty() {
            return Err(EditorError::EmptyTitle);
        }
        tracing::info!(scenario = %id, "renaming scenario");

        let result = self.deps.store.rename_scenario(id, new_title).await;
        self.finish_write(result, MSG_RENAMED, MSG_RENAME_FAILED)
    }

    /// Delete `id`; the session stays `Loaded` until its owner navigates away
    ///
    /// # Errors
    /// Same as [`rename`](Self::rename), minus `EmptyTitle`.
    pub async fn delete(&mut self, id: &ScenarioId) -> Result<ServerReply, EditorError> {
        self.ensure_ready(id)?;
        tracing::info!(scenario = %id, "deleting scenario");

        let result = self.deps.store.delete_scenario(id).await;
        self.finish_write(result, MSG_DELETED, MSG_DELETE_FAILED)
    }

    fn ensure_ready(&self, id: &ScenarioId) -> Result<(), EditorError> {
        if !self.deps.identity.is_ready() {
            tracing::debug!(scenario = %id, "identity not ready, skipping");
            return Err(EditorError::NotReady);
        }
        self.ensure_loaded(id)
    }

    fn ensure_loaded(&self, id: &ScenarioId) -> Result<(), EditorError> {
        if !self.state.is_open() {
            return Err(EditorError::SessionClosed);
        }
        match &self.scenario {
            Some(s) if self.state.is_loaded() && s.id == *id => Ok(()),
            _ => Err(EditorError::NotLoaded(id.clone())),
        }
    }

    fn finish_write(
        &mut self,
        result: Result<ServerReply, insync_client::RemoteError>,
        success_message: &str,
        transport_message: &str,
    ) -> Result<ServerReply, EditorError> {
        match result {
            Ok(reply) => {
                self.pending = true;
                let message = Some(reply.message.as_str())
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(success_message);
                self.deps.notifier.notify(Notification::success(message));
                Ok(reply)
            }
            Err(err) if err.is_server_answer() => {
                tracing::warn!(error = %err, "server rejected write");
                self.pending = true;
                let message = err.server_message().unwrap_or(transport_message);
                self.deps.notifier.notify(Notification::error(message));
                Err(EditorError::from_write(err))
            }
            Err(err) => {
                tracing::warn!(error = %err, "write did not reach server");
                self.deps.notifier.notify(Notification::error(transport_message));
                Err(EditorError::from_write(err))
            }
        }
    }

    /// Push both step payloads to the store
    ///
    /// Web steps come from the draft slot, android steps from the editing
    /// surface as it reads right now. Both updates run concurrently; the save
    /// succeeds only if both do. Nothing is rolled back when one fails.
    ///
    /// # Errors
    /// - `EditorError::NothingLoaded` / `SessionClosed` outside `Loaded`
    /// - `EditorError::SaveFailed` if either update fails
    pub async fn save(&mut self) -> Result<(), EditorError> {
        let id = match (&self.scenario, self.state) {
            (Some(s), SessionState::Loaded) => s.id.clone(),
            (_, state) if state.is_open() => return Err(EditorError::NothingLoaded),
            _ => return Err(EditorError::SessionClosed),
        };

        let web = match self.deps.storage.get(&self.config.draft_key) {
            Ok(web) => web,
            Err(err) => {
                tracing::warn!(scenario = %id, error = %err, "draft unreadable");
                self.deps.notifier.notify(Notification::error(MSG_SAVE_FAILED));
                return Err(EditorError::SaveFailed);
            }
        };
        let android = self.deps.surface.current_text();
        tracing::info!(scenario = %id, "saving scenario");

        let store = &self.deps.store;
        let (web_result, android_result) = futures::join!(
            store.update_steps(&id, StepsTarget::Web, web.as_deref()),
            store.update_steps(&id, StepsTarget::Android, android.as_deref()),
        );

        for (target, result) in [
            (StepsTarget::Web, &web_result),
            (StepsTarget::Android, &android_result),
        ] {
            if let Err(err) = result {
                tracing::warn!(scenario = %id, %target, error = %err, "steps update failed");
            }
        }

        if web_result.is_ok() && android_result.is_ok() {
            self.deps.notifier.notify(Notification::success(MSG_SAVED));
            Ok(())
        } else {
            self.deps.notifier.notify(Notification::error(MSG_SAVE_FAILED));
            Err(EditorError::SaveFailed)
        }
    }

    /// Route a key press; saves when it matches the save shortcut
    ///
    /// A matching event has its default handling suppressed before the save
    /// starts. Other events are left untouched and yield `None`.
    pub async fn handle_key(&mut self, event: &mut KeyEvent) -> Option<Result<(), EditorError>> {
        if !self.config.save_shortcut.matches(event) {
            return None;
        }
        event.prevent_default();
        Some(self.save().await)
    }
}
