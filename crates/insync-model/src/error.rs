//! Error types for the scenario model

/// Errors raised while constructing or validating model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Identifier was empty or only whitespace
    #[error("empty {kind} identifier")]
    EmptyIdentifier {
        /// Which identifier was rejected
        kind: &'static str,
    },

    /// Step payload is not a well-formed JSON document
    #[error("malformed steps payload: {0}")]
    MalformedSteps(String),

    /// Step payload was empty
    #[error("steps payload is empty")]
    EmptySteps,
}

impl ModelError {
    /// Check if error came from payload validation
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MalformedSteps(_) | Self::EmptySteps)
    }
}
