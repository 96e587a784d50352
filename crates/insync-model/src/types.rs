//! Core types for scenarios
//!
//! Defines the records exchanged with the remote store:
//! - Opaque identifiers for scenarios, projects and users
//! - The scenario record with its two step payloads

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create identifier, rejecting blank input
            ///
            /// # Errors
            /// - `ModelError::EmptyIdentifier` if `raw` is empty or whitespace
            pub fn new(raw: impl Into<String>) -> Result<Self, ModelError> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    return Err(ModelError::EmptyIdentifier { kind: $kind });
                }
                Ok(Self(raw))
            }

            /// Borrow the raw identifier
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(
    /// Scenario identifier assigned by the remote store
    ScenarioId,
    "scenario"
);
opaque_id!(
    /// Project identifier; also the value of the selected project marker
    ProjectId,
    "project"
);
opaque_id!(
    /// Identity provider user identifier
    UserId,
    "user"
);

/// Scenario record as served by `GET /scenarios/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    /// Scenario ID
    pub id: ScenarioId,
    /// Owning project
    pub project_id: ProjectId,
    /// Owning project's display name
    #[serde(default)]
    pub project_name: String,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Raw timestamp text as sent by the server
    #[serde(default)]
    pub created_at: String,
    /// Raw last-update timestamp text
    #[serde(default)]
    pub updated_at: String,
    /// Serialized web step definitions, possibly empty
    #[serde(default)]
    pub steps_web: Option<String>,
    /// Serialized android step definitions, possibly empty
    #[serde(default)]
    pub steps_android: Option<String>,
    /// Marked as a favorite by the viewer
    #[serde(default)]
    pub is_favorites: bool,
    /// Card thumbnail
    #[serde(default)]
    pub image_url: String,
    /// Author's user id
    #[serde(default)]
    pub author_id: String,
    /// Author's id in GUID form
    #[serde(default)]
    pub author_id_guid: String,
    /// Author's display name
    #[serde(default)]
    pub author_name: String,
}

impl Scenario {
    /// Create a minimal scenario record
    #[must_use]
    pub fn new(id: ScenarioId, project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            project_name: String::new(),
            title: title.into(),
            description: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            steps_web: None,
            steps_android: None,
            is_favorites: false,
            image_url: String::new(),
            author_id: String::new(),
            author_id_guid: String::new(),
            author_name: String::new(),
        }
    }

    /// With web step payload
    #[inline]
    #[must_use]
    pub fn with_steps_web(mut self, steps: impl Into<String>) -> Self {
        self.steps_web = Some(steps.into());
        self
    }

    /// With android step payload
    #[inline]
    #[must_use]
    pub fn with_steps_android(mut self, steps: impl Into<String>) -> Self {
        self.steps_android = Some(steps.into());
        self
    }

    /// With author identity
    #[inline]
    #[must_use]
    pub fn with_author(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.author_id = id.into();
        self.author_name = name.into();
        self
    }

    /// With creation timestamp text
    #[inline]
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Whether this scenario belongs to `project`
    #[inline]
    #[must_use]
    pub fn belongs_to(&self, project: Option<&ProjectId>) -> bool {
        project.is_some_and(|p| *p == self.project_id)
    }

    /// Web steps, treating an empty string as absent
    #[inline]
    #[must_use]
    pub fn web_steps(&self) -> Option<&str> {
        self.steps_web.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_id_rejects_blank() {
        assert!(ScenarioId::new("").is_err());
        assert!(ScenarioId::new("   ").is_err());
        assert_eq!(ScenarioId::new("S1").unwrap().as_str(), "S1");
    }

    #[test]
    fn scenario_deserializes_camel_case() {
        let raw = r#"{
            "id": "S1",
            "projectId": "P1",
            "projectName": "Checkout",
            "title": "Login flow",
            "description": "",
            "createdAt": "2024-05-01T10:00:00",
            "updatedAt": "2024-05-02T10:00:00",
            "stepsWeb": "{\"a\":1}",
            "stepsAndroid": null,
            "isFavorites": true,
            "imageUrl": "/placeholders/1.svg",
            "authorId": "user_1",
            "authorIdGuid": "0f3c",
            "authorName": "Ada",
            "extra": 42
        }"#;

        let scenario: Scenario = serde_json::from_str(raw).unwrap();
        assert_eq!(scenario.id.as_str(), "S1");
        assert_eq!(scenario.project_id.as_str(), "P1");
        assert_eq!(scenario.steps_web.as_deref(), Some("{\"a\":1}"));
        assert_eq!(scenario.steps_android, None);
        assert!(scenario.is_favorites);
        assert_eq!(scenario.author_name, "Ada");
    }

    #[test]
    fn scenario_missing_optional_fields_default() {
        let scenario: Scenario = serde_json::from_str(r#"{"id":"S1","projectId":"P1"}"#).unwrap();
        assert_eq!(scenario, Scenario::new(
            ScenarioId::new("S1").unwrap(),
            ProjectId::new("P1").unwrap(),
            "",
        ));
    }

    #[test]
    fn belongs_to_requires_marker() {
        let p1 = ProjectId::new("P1").unwrap();
        let p2 = ProjectId::new("P2").unwrap();
        let scenario = Scenario::new(ScenarioId::new("S1").unwrap(), p1.clone(), "t");

        assert!(scenario.belongs_to(Some(&p1)));
        assert!(!scenario.belongs_to(Some(&p2)));
        assert!(!scenario.belongs_to(None));
    }

    #[test]
    fn web_steps_treats_empty_as_absent() {
        let scenario = Scenario::new(
            ScenarioId::new("S1").unwrap(),
            ProjectId::new("P1").unwrap(),
            "t",
        );
        assert_eq!(scenario.clone().with_steps_web("").web_steps(), None);
        assert_eq!(scenario.with_steps_web("[]").web_steps(), Some("[]"));
    }
}
