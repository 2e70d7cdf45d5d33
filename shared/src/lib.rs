//! Shared types for the study spots service
//!
//! Enumerated spot attributes, vote types and session DTOs used by the
//! server and by any client talking to it.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Location, NoiseLevel, SpotType, VoteKind};
