//! Identity provider boundary
//!
//! The editor never authenticates anyone itself. It only asks whether the
//! provider has finished resolving the current user.

use insync_model::UserId;
use parking_lot::RwLock;

/// Source of the signed-in user
pub trait IdentityProvider: Send + Sync {
    /// Whether identity resolution has completed
    fn is_loaded(&self) -> bool;

    /// Current user, if one is signed in
    fn user_id(&self) -> Option<UserId>;

    /// Loaded with a signed-in user
    fn is_ready(&self) -> bool {
        self.is_loaded() && self.user_id().is_some()
    }
}

/// Identity that can be resolved after construction
///
/// Starts unloaded; [`resolve`](Self::resolve) completes it.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    inner: RwLock<Option<Option<UserId>>>,
}

impl StaticIdentity {
    /// Unresolved identity
    #[inline]
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Identity already resolved to `user`
    #[must_use]
    pub fn signed_in(user: UserId) -> Self {
        Self {
            inner: RwLock::new(Some(Some(user))),
        }
    }

    /// Identity resolved with nobody signed in
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            inner: RwLock::new(Some(None)),
        }
    }

    /// Complete resolution
    pub fn resolve(&self, user: Option<UserId>) {
        *self.inner.write() = Some(user);
    }
}

impl IdentityProvider for StaticIdentity {
    fn is_loaded(&self) -> bool {
        self.inner.read().is_some()
    }

    fn user_id(&self) -> Option<UserId> {
        self.inner.read().clone().flatten()
    }
}
