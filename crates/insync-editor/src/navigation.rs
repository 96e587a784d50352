//! Back-navigation and the delayed task that triggers it

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Host navigation
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Return to the previous view
    fn navigate_back(&self);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate_back(&self) {
        (**self).navigate_back();
    }
}

/// Navigator that only records the request in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_back(&self) {
        tracing::info!("navigating back");
    }
}

/// A callback scheduled to run once after a delay
///
/// Dropping the task cancels it if it has not run yet.
#[derive(Debug)]
pub struct DelayedTask {
    handle: Option<JoinHandle<()>>,
}

impl DelayedTask {
    /// Spawn `action` to run after `delay` on the current tokio runtime
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn schedule<F>(delay: Duration, action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the task if it has not run yet
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether the task ran or was cancelled
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the task; `true` if the action ran
    pub async fn wait(mut self) -> bool {
        match self.handle.take() {
            Some(handle) => handle.await.is_ok(),
            None => false,
        }
    }
}

impl Drop for DelayedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
