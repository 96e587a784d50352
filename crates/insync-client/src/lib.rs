//! InSync Client - remote scenario store
//!
//! The authoritative copy of every scenario lives behind a REST API. This
//! crate defines the [`ScenarioStore`] capability the editor talks to and
//! [`HttpScenarioStore`], its reqwest implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use insync_client::{ApiConfig, HttpScenarioStore, ScenarioStore};
//! use insync_model::ScenarioId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpScenarioStore::new(&ApiConfig::new("https://api.example.com"))?;
//! let scenario = store.fetch_scenario(&ScenarioId::new("S1")?).await?;
//! println!("{}", scenario.title);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod http;
pub mod store;

pub use config::ApiConfig;
pub use error::RemoteError;
pub use http::HttpScenarioStore;
pub use store::{ScenarioStore, ServerReply, StepsTarget};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
