//! InSync Model - scenario records and step payloads
//!
//! Shared vocabulary for the editor workspace:
//! - Opaque identifiers (`ScenarioId`, `ProjectId`, `UserId`)
//! - The `Scenario` record as served by the remote store
//! - `StepsPayload`, a JSON-validated step definition document
//! - Card labels (author and relative creation time)

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod card;
pub mod error;
pub mod steps;
pub mod types;

pub use card::{author_label, created_at_label, parse_timestamp};
pub use error::ModelError;
pub use steps::{is_valid_json, StepsPayload};
pub use types::{ProjectId, Scenario, ScenarioId, UserId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
