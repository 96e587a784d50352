//! Editing session state machine
//!
//! ```text
//! Initializing ──load ok──▶ Loaded ──save/rename/delete──▶ Loaded
//!      │
//!      └──load failed──▶ NotFoundPendingExit ──delay──▶ Exited
//!
//! any ──teardown──▶ TornDown
//! ```

/// Lifecycle state of an editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, or reloading; no scenario available
    Initializing,
    /// Scenario loaded; save, rename and delete allowed
    Loaded,
    /// Load failed; back-navigation is scheduled
    NotFoundPendingExit,
    /// Back-navigation ran
    Exited,
    /// Session closed by its owner
    TornDown,
}

impl SessionState {
    /// Whether the session still accepts operations
    #[inline]
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Initializing | Self::Loaded)
    }

    /// Whether save, rename and delete are allowed
    #[inline]
    #[must_use]
    pub fn is_loaded(self) -> bool {
        self == Self::Loaded
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::Loaded => "loaded",
            Self::NotFoundPendingExit => "not-found-pending-exit",
            Self::Exited => "exited",
            Self::TornDown => "torn-down",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_states() {
        assert!(SessionState::Initializing.is_open());
        assert!(SessionState::Loaded.is_open());
        assert!(!SessionState::NotFoundPendingExit.is_open());
        assert!(!SessionState::TornDown.is_open());
        assert!(SessionState::Loaded.is_loaded());
        assert!(!SessionState::Initializing.is_loaded());
    }
}
