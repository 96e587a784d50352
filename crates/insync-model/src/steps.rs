//! Step payload validation
//!
//! Step definitions are opaque JSON documents. The editor never rewrites
//! them; it only checks that a payload parses before staging it as a draft.

use crate::error::ModelError;

/// A step payload known to be well-formed JSON
///
/// Holds the original text untouched so it round-trips byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsPayload(String);

impl StepsPayload {
    /// Validate `raw` as a JSON document
    ///
    /// # Errors
    /// - `ModelError::EmptySteps` if `raw` is empty
    /// - `ModelError::MalformedSteps` if `raw` does not parse
    pub fn parse(raw: impl Into<String>) -> Result<Self, ModelError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ModelError::EmptySteps);
        }
        serde_json::from_str::<serde::de::IgnoredAny>(&raw)
            .map_err(|e| ModelError::MalformedSteps(e.to_string()))?;
        Ok(Self(raw))
    }

    /// Borrow the validated text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the validated text
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Check whether `raw` is well-formed JSON
#[inline]
#[must_use]
pub fn is_valid_json(raw: &str) -> bool {
    StepsPayload::parse(raw).is_ok()
}
