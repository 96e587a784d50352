//! Error types for editing sessions
//!
//! Provides the failure taxonomy of the reconciler:
//! - Load failures, all reported as `NotFound`
//! - Remote write failures (rename, delete, save)
//! - Precondition failures (identity not ready, session not loaded)
//! - Configuration errors

use insync_client::RemoteError;
use insync_model::{ProjectId, ScenarioId};
use insync_storage::StorageError;

/// Main editor error type
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Scenario could not be loaded for the selected project
    #[error("scenario {id} not found")]
    NotFound {
        /// Requested scenario
        id: ScenarioId,
        /// Internal cause; callers are shown the same outcome for all of them
        reason: NotFoundReason,
    },

    /// Server rejected a rename or delete
    #[error("remote write failed: {}", message.as_deref().unwrap_or("no details"))]
    RemoteWriteFailure {
        /// Server-provided error title, if any
        message: Option<String>,
    },

    /// Request never reached the server or no answer came back
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// At least one of the two step updates failed
    #[error("failed to save scenario")]
    SaveFailed,

    /// Identity provider has not resolved a signed-in user yet
    #[error("identity not ready")]
    NotReady,

    /// Operation needs a loaded scenario with this identifier
    #[error("scenario {0} is not loaded in this session")]
    NotLoaded(ScenarioId),

    /// Session has no loaded scenario yet
    #[error("no scenario loaded")]
    NothingLoaded,

    /// Session was torn down or is exiting
    #[error("editing session is closed")]
    SessionClosed,

    /// Rename title was empty
    #[error("scenario title must not be empty")]
    EmptyTitle,

    /// Slot storage failed outside of a load
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl EditorError {
    /// Check if error is the load failure outcome
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the user can retry the same action in place
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RemoteWriteFailure { .. } | Self::TransportFailure(_) | Self::SaveFailed
        )
    }

    /// Map a rename/delete failure
    pub(crate) fn from_write(err: RemoteError) -> Self {
        if err.is_server_answer() {
            Self::RemoteWriteFailure {
                message: err.server_message().map(str::to_string),
            }
        } else {
            Self::TransportFailure(err.to_string())
        }
    }
}

/// Why a load ended in `NotFound`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    /// Fetch returned a non-success status
    Missing {
        /// HTTP status of the answer
        status: u16,
    },
    /// Fetch failed before a usable answer arrived
    Transport(String),
    /// Scenario belongs to a project other than the selected one
    ProjectMismatch {
        /// Selected project marker at load time
        selected: Option<ProjectId>,
        /// Scenario's owning project
        actual: ProjectId,
    },
    /// Draft or marker slot could not be accessed
    Storage(String),
}

impl From<RemoteError> for NotFoundReason {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Rejected { status, .. } => Self::Missing { status },
            other => Self::Transport(other.to_string()),
        }
    }
}

impl From<StorageError> for NotFoundReason {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl std::fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { status } => write!(f, "fetch returned status {status}"),
            Self::Transport(e) => write!(f, "fetch failed: {e}"),
            Self::ProjectMismatch { selected: Some(p), actual } => {
                write!(f, "scenario belongs to {actual}, selected project is {p}")
            }
            Self::ProjectMismatch { selected: None, actual } => {
                write!(f, "scenario belongs to {actual}, no project selected")
            }
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ScenarioId {
        ScenarioId::new("S1").unwrap()
    }

    #[test]
    fn editor_error_display() {
        let err = EditorError::NotFound {
            id: id(),
            reason: NotFoundReason::Missing { status: 404 },
        };
        assert_eq!(err.to_string(), "scenario S1 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn editor_error_is_retryable() {
        assert!(EditorError::SaveFailed.is_retryable());
        assert!(EditorError::TransportFailure("reset".into()).is_retryable());
        assert!(!EditorError::NotReady.is_retryable());
        assert!(!EditorError::NotLoaded(id()).is_retryable());
    }

    #[test]
    fn write_failures_split_on_server_answer() {
        let rejected = EditorError::from_write(RemoteError::rejected(409, Some("Taken".into())));
        assert!(matches!(
            rejected,
            EditorError::RemoteWriteFailure { message: Some(ref m) } if m == "Taken"
        ));

        let transport = EditorError::from_write(RemoteError::Transport("refused".into()));
        assert!(matches!(transport, EditorError::TransportFailure(_)));
    }

    #[test]
    fn not_found_reason_from_remote() {
        assert_eq!(
            NotFoundReason::from(RemoteError::rejected(404, None)),
            NotFoundReason::Missing { status: 404 }
        );
        assert!(matches!(
            NotFoundReason::from(RemoteError::Decode("eof".into())),
            NotFoundReason::Transport(_)
        ));
    }

    #[test]
    fn not_found_reason_display() {
        let reason = NotFoundReason::ProjectMismatch {
            selected: Some(ProjectId::new("P2").unwrap()),
            actual: ProjectId::new("P1").unwrap(),
        };
        assert_eq!(
            reason.to_string(),
            "scenario belongs to P1, selected project is P2"
        );
    }
}
