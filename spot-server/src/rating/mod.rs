//! Rating aggregation
//!
//! A spot keeps a running mean of its review stars next to the ordered list
//! of review ids. The mean is updated incrementally from the previous mean
//! and the list length, never re-derived from the reviews themselves:
//!
//! ```text
//! add:    avg' = (avg * n + star) / (n + 1)
//! remove: avg' = (avg * n - star) / (n - 1)    when n - 1 > 0
//!         avg' = 0                             otherwise
//! ```
//!
//! The arithmetic lives in pure functions so it can be checked without a
//! store; [`add_review`] / [`remove_review`] apply it to a [`Spot`] together
//! with the id list so both change in the same document write.

use std::fmt;

use shared::models::{MAX_STAR, MIN_STAR};
use surrealdb::RecordId;

use crate::db::models::Spot;

/// A validated 1-5 star rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Star(u8);

impl Star {
    pub fn new(value: i64) -> Option<Self> {
        if (MIN_STAR as i64..=MAX_STAR as i64).contains(&value) {
            Some(Star(value as u8))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mean after one more review with `star`
pub fn average_after_add(current_average: f64, current_count: usize, star: Star) -> f64 {
    let n = current_count as f64;
    (current_average * n + f64::from(star.value())) / (n + 1.0)
}

/// Mean after removing one review with `star` from `current_count` reviews
///
/// Removing the last (or a non-existent) review resets the mean to 0.
pub fn average_after_remove(current_average: f64, current_count: usize, star: Star) -> f64 {
    if current_count <= 1 {
        return 0.0;
    }
    let n = current_count as f64;
    (current_average * n - f64::from(star.value())) / (n - 1.0)
}

/// Number of star glyphs to show for a mean rating
///
/// Round-half-up: 4.5 shows five stars, 4.49 shows four. Clamped to 0..=5.
pub fn star_glyphs(average: f64) -> u8 {
    if !average.is_finite() || average <= 0.0 {
        return 0;
    }
    (average + 0.5).floor().min(f64::from(MAX_STAR)) as u8
}

/// Append `review_id` to the spot and fold `star` into its mean
pub fn add_review(spot: &mut Spot, review_id: RecordId, star: Star) {
    spot.average_star = average_after_add(spot.average_star, spot.review_ids.len(), star);
    spot.review_ids.push(review_id);
}

/// Drop `review_id` from the spot and take `star` out of its mean
///
/// Returns `false` (spot untouched) when the id is not attached to the spot.
pub fn remove_review(spot: &mut Spot, review_id: &RecordId, star: Star) -> bool {
    let Some(pos) = spot.review_ids.iter().position(|id| id == review_id) else {
        return false;
    };
    spot.average_star = average_after_remove(spot.average_star, spot.review_ids.len(), star);
    spot.review_ids.remove(pos);
    true
}
