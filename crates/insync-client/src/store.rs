//! Remote scenario store capability

use crate::error::RemoteError;
use async_trait::async_trait;
use insync_model::{Scenario, ScenarioId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Success body of rename and delete calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerReply {
    /// Human-readable confirmation
    #[serde(default)]
    pub message: String,
}

impl ServerReply {
    /// Create reply with message
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body of rejected calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct ServerProblem {
    #[serde(default)]
    pub(crate) title: Option<String>,
}

/// Which step payload an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepsTarget {
    /// `update-web-json`
    Web,
    /// `update-android-json`
    Android,
}

impl StepsTarget {
    /// Endpoint segment for this target
    #[inline]
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Web => "update-web-json",
            Self::Android => "update-android-json",
        }
    }
}

impl std::fmt::Display for StepsTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Web => f.write_str("web"),
            Self::Android => f.write_str("android"),
        }
    }
}

/// Authoritative store for scenarios
///
/// Every method maps to one REST call. Implementations report a non-success
/// status as [`RemoteError::Rejected`] and everything else that prevents an
/// answer as a transport or decode error.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// `GET /scenarios/{id}`
    async fn fetch_scenario(&self, id: &ScenarioId) -> Result<Scenario, RemoteError>;

    /// `PUT /scenarios/rename-scenario/{id}`
    async fn rename_scenario(
        &self,
        id: &ScenarioId,
        new_title: &str,
    ) -> Result<ServerReply, RemoteError>;

    /// `DELETE /scenarios/{id}`
    async fn delete_scenario(&self, id: &ScenarioId) -> Result<ServerReply, RemoteError>;

    /// `PUT /scenarios/update-{web,android}-json/{id}`
    ///
    /// `steps` is sent as a JSON string literal; `None` is sent as `null`.
    async fn update_steps(
        &self,
        id: &ScenarioId,
        target: StepsTarget,
        steps: Option<&str>,
    ) -> Result<(), RemoteError>;
}

#[async_trait]
impl<S: ScenarioStore + ?Sized> ScenarioStore for Arc<S> {
    async fn fetch_scenario(&self, id: &ScenarioId) -> Result<Scenario, RemoteError> {
        (**self).fetch_scenario(id).await
    }

    async fn rename_scenario(
        &self,
        id: &ScenarioId,
        new_title: &str,
    ) -> Result<ServerReply, RemoteError> {
        (**self).rename_scenario(id, new_title).await
    }

    async fn delete_scenario(&self, id: &ScenarioId) -> Result<ServerReply, RemoteError> {
        (**self).delete_scenario(id).await
    }

    async fn update_steps(
        &self,
        id: &ScenarioId,
        target: StepsTarget,
        steps: Option<&str>,
    ) -> Result<(), RemoteError> {
        (**self).update_steps(id, target, steps).await
    }
}
