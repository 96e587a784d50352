//! Editor configuration
//!
//! Defaults reproduce the slot keys, exit delay and shortcut the web editor
//! uses. A TOML document may override any subset of fields; environment
//! variables override both.

use crate::error::EditorError;
use crate::shortcut::KeyChord;
use insync_client::ApiConfig;
use insync_storage::{DRAFT_KEY, SELECTED_PROJECT_KEY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api.base_url`
pub const ENV_API_URL: &str = "INSYNC_API_URL";
/// Environment variable overriding `api.api_key`
pub const ENV_API_KEY: &str = "INSYNC_API_KEY";
/// Environment variable overriding `exit_delay_ms`
pub const ENV_EXIT_DELAY_MS: &str = "INSYNC_EXIT_DELAY_MS";

/// Editing session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Remote store connection
    pub api: ApiConfig,
    /// Slot holding the local draft
    pub draft_key: String,
    /// Slot holding the selected project marker
    pub marker_key: String,
    /// Delay between a failed load and navigating back
    pub exit_delay_ms: u64,
    /// Chord that triggers a save
    pub save_shortcut: KeyChord,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With remote store settings
    #[inline]
    #[must_use]
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// With exit delay
    #[inline]
    #[must_use]
    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With save shortcut
    #[inline]
    #[must_use]
    pub fn with_save_shortcut(mut self, chord: KeyChord) -> Self {
        self.save_shortcut = chord;
        self
    }

    /// Exit delay as a duration
    #[inline]
    #[must_use]
    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// - `EditorError::Config` on malformed TOML or invalid values
    pub fn from_toml_str(raw: &str) -> Result<Self, EditorError> {
        toml::from_str(raw).map_err(|e| EditorError::Config(e.to_string()))
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// - `EditorError::Config` if the file cannot be read or parsed
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| EditorError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// - `EditorError::Config` if an override has an invalid value
    pub fn with_env_overrides(self) -> Result<Self, EditorError> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`
    ///
    /// # Errors
    /// - `EditorError::Config` if an override has an invalid value
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, EditorError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(delay) = lookup(ENV_EXIT_DELAY_MS) {
            self.exit_delay_ms = delay
                .trim()
                .parse()
                .map_err(|e| EditorError::Config(format!("{ENV_EXIT_DELAY_MS}={delay}: {e}")))?;
        }
        Ok(self)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            draft_key: DRAFT_KEY.to_string(),
            marker_key: SELECTED_PROJECT_KEY.to_string(),
            exit_delay_ms: 3_000,
            save_shortcut: KeyChord::ctrl_s(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.draft_key, "jsonGeneratorWorkspace");
        assert_eq!(config.marker_key, "selectedProjectId");
        assert_eq!(config.exit_delay(), Duration::from_secs(3));
        assert_eq!(config.save_shortcut, KeyChord::ctrl_s());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
            exit_delay_ms = 500
            save_shortcut = "meta+s"

            [api]
            base_url = "https://api.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.exit_delay_ms, 500);
        assert!(config.save_shortcut.modifiers.meta);
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.draft_key, "jsonGeneratorWorkspace");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = EditorConfig::from_toml_str("save_shortcut = \"ctrl\"").unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }

    #[test]
    fn toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insync.toml");
        std::fs::write(&path, "draft_key = \"scratch\"\n").unwrap();

        let config = EditorConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.draft_key, "scratch");
        assert!(EditorConfig::from_toml_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn overrides_apply() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://staging.example.com"),
            (ENV_API_KEY, "k-123"),
            (ENV_EXIT_DELAY_MS, "1500"),
        ]
        .into_iter()
        .collect();

        let config = EditorConfig::new()
            .with_overrides_from(|name| env.get(name).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.api.base_url, "https://staging.example.com");
        assert_eq!(config.api.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.exit_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn invalid_override_is_config_error() {
        let result = EditorConfig::new().with_overrides_from(|name| {
            (name == ENV_EXIT_DELAY_MS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(EditorError::Config(_))));
    }
}
