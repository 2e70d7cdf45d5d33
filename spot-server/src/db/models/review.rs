//! Review Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Review ID type
pub type ReviewId = RecordId;

/// Review model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReviewId>,
    #[serde(with = "serde_helpers::record_id")]
    pub spot: RecordId,
    pub star: u8,
    pub text: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub dislike_count: u64,
    pub created_at: i64,
    pub author_username: String,
}
