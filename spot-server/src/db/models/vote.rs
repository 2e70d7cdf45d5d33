//! Vote Model
//!
//! One row per (review, voter); a unique index rejects repeat votes.

use serde::{Deserialize, Serialize};
use shared::models::VoteKind;
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub review: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub spot: RecordId,
    pub voter: String,
    pub kind: VoteKind,
    pub created_at: i64,
}
