//! Database Models

// Serde helpers
pub mod serde_helpers;

pub mod review;
pub mod spot;
pub mod user;
pub mod vote;

// Re-exports
pub use review::{Review, ReviewId};
pub use spot::{Spot, SpotDraft, SpotId, SpotView};
pub use user::{User, UserCreate, UserId};
pub use vote::Vote;
