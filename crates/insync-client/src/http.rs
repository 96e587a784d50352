//! reqwest-backed scenario store

use crate::config::ApiConfig;
use crate::error::RemoteError;
use crate::store::{ScenarioStore, ServerProblem, ServerReply, StepsTarget};
use async_trait::async_trait;
use insync_model::{Scenario, ScenarioId};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use std::time::Duration;

/// Rename request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenameRequest<'a> {
    scenario_name: &'a str,
    id: &'a str,
}

/// HTTP client for the scenario REST API
#[derive(Debug, Clone)]
pub struct HttpScenarioStore {
    client: Client,
    base: Url,
    api_key: Option<String>,
    bearer: Option<String>,
}

impl HttpScenarioStore {
    /// Create client from connection settings
    ///
    /// # Errors
    /// - `RemoteError::InvalidUrl` if `base_url` does not parse as a base URL
    /// - `RemoteError::Transport` if the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| RemoteError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base,
            api_key: config.api_key.clone(),
            bearer: None,
        })
    }

    /// With bearer token for the `Authorization` header
    #[inline]
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Build `{base}/api/{segments...}`, percent-encoding each segment
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self.authorize(request).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::rejected(status, problem_title(&body)))
    }

    /// Send a rename/delete; only `200 OK` counts as done
    async fn reply(&self, request: RequestBuilder) -> Result<ServerReply, RemoteError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(RemoteError::rejected(status.as_u16(), problem_title(&body)));
        }
        if body.trim().is_empty() {
            return Ok(ServerReply::default());
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

/// Extract the `title` of a problem body, if the body is one
fn problem_title(body: &str) -> Option<String> {
    serde_json::from_str::<ServerProblem>(body)
        .ok()
        .and_then(|p| p.title)
}

/// Encode a step payload as the JSON string literal the API expects
pub(crate) fn encode_steps(steps: Option<&str>) -> Result<String, RemoteError> {
    serde_json::to_string(&steps).map_err(|e| RemoteError::Decode(e.to_string()))
}

#[async_trait]
impl ScenarioStore for HttpScenarioStore {
    async fn fetch_scenario(&self, id: &ScenarioId) -> Result<Scenario, RemoteError> {
        let url = self.endpoint(&["scenarios", id.as_str()])?;
        tracing::debug!(%url, "fetching scenario");

        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn rename_scenario(
        &self,
        id: &ScenarioId,
        new_title: &str,
    ) -> Result<ServerReply, RemoteError> {
        let url = self.endpoint(&["scenarios", "rename-scenario", id.as_str()])?;
        tracing::debug!(%url, "renaming scenario");

        let body = RenameRequest {
            scenario_name: new_title,
            id: id.as_str(),
        };
        self.reply(self.client.put(url).json(&body)).await
    }

    async fn delete_scenario(&self, id: &ScenarioId) -> Result<ServerReply, RemoteError> {
        let url = self.endpoint(&["scenarios", id.as_str()])?;
        tracing::debug!(%url, "deleting scenario");

        self.reply(self.client.delete(url)).await
    }

    async fn update_steps(
        &self,
        id: &ScenarioId,
        target: StepsTarget,
        steps: Option<&str>,
    ) -> Result<(), RemoteError> {
        let url = self.endpoint(&["scenarios", target.endpoint(), id.as_str()])?;
        tracing::debug!(%url, %target, "updating steps");

        let body = encode_steps(steps)?;
        self.send(self.client.put(url).body(body)).await?;
        Ok(())
    }
}
