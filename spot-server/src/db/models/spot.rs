//! Spot Model

use serde::{Deserialize, Serialize};
use shared::models::{Location, NoiseLevel, SpotType};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::rating::star_glyphs;

/// Spot ID type
pub type SpotId = RecordId;

/// Spot model matching SurrealDB schema
///
/// `review_ids` and `average_star` are only written through
/// [`crate::rating`]; `version` is bumped on every write for
/// compare-and-swap updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SpotId>,
    pub name: String,
    pub address: String,
    pub location: Location,
    pub spot_type: SpotType,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub purchase_required: bool,
    pub noise_level: NoiseLevel,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_ref: Option<String>,
    pub created_at: i64,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub review_ids: Vec<RecordId>,
    #[serde(default)]
    pub average_star: f64,
    #[serde(default)]
    pub version: u64,
}

impl Spot {
    /// Star glyphs to render for this spot's mean rating
    pub fn star_glyphs(&self) -> u8 {
        star_glyphs(self.average_star)
    }

    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Validated spot fields, as written on create and edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotDraft {
    pub name: String,
    pub address: String,
    pub location: Location,
    pub spot_type: SpotType,
    pub purchase_required: bool,
    pub noise_level: NoiseLevel,
    pub description: String,
}

/// Spot as listed to clients, with its display rating
#[derive(Debug, Clone, Serialize)]
pub struct SpotView {
    #[serde(flatten)]
    pub spot: Spot,
    pub review_count: usize,
    pub star_glyphs: u8,
}

impl From<Spot> for SpotView {
    fn from(spot: Spot) -> Self {
        Self {
            review_count: spot.review_ids.len(),
            star_glyphs: spot.star_glyphs(),
            spot,
        }
    }
}
