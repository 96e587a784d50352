//! InSync Editor - scenario draft reconciler
//!
//! Keeps a scenario's step definitions consistent between a local draft slot
//! and the remote store:
//! - Loads a scenario only when it belongs to the selected project
//! - Stages validated web steps as the single local draft
//! - Saves web (draft) and android (live surface) steps concurrently
//! - Renames and deletes once identity is resolved
//! - Navigates back after a delay when a scenario cannot be loaded
//!
//! # Example
//!
//! ```rust,ignore
//! use insync_editor::{EditorConfig, EditorSession, SessionDeps};
//! use insync_model::ScenarioId;
//!
//! # async fn example(deps: SessionDeps) -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = EditorSession::new(EditorConfig::new(), deps);
//! let scenario = session.load(ScenarioId::new("S1")?).await?;
//! println!("editing {}", scenario.title);
//!
//! session.save().await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod identity;
pub mod navigation;
pub mod notify;
pub mod session;
pub mod shortcut;
pub mod state;
pub mod surface;

pub use config::EditorConfig;
pub use error::{EditorError, NotFoundReason};
pub use identity::{IdentityProvider, StaticIdentity};
pub use navigation::{DelayedTask, LogNavigator, Navigator};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use session::{EditorSession, SessionDeps};
pub use shortcut::{KeyChord, KeyEvent, Modifiers};
pub use state::SessionState;
pub use surface::{EditingSurface, TextBuffer};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving an editing session
    pub use crate::{
        EditorConfig, EditorError, EditorSession, IdentityProvider, KeyEvent, Navigator,
        Notification, Notifier, SessionDeps, SessionState,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
