//! Review and vote orchestration
//!
//! Rating fields live on the spot document and are recomputed with the pure
//! functions in [`crate::rating`]. Writes go through a compare-and-swap on the
//! spot's `version`; a lost race re-reads and recomputes.

use shared::models::{ReviewSubmitResult, VoteKind, VoteResult};
use surrealdb::RecordId;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::db::models::{Review, Spot};
use crate::db::repository::{RepoError, ReviewRepository, SpotRepository, VoteRepository};
use crate::rating::{self, Star};
use crate::utils::validation::{MAX_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Attempts before giving up on a contended spot
pub const MAX_CAS_ATTEMPTS: usize = 8;

#[derive(Clone)]
pub struct ReviewService {
    spots: SpotRepository,
    reviews: ReviewRepository,
    votes: VoteRepository,
}

impl ReviewService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            spots: SpotRepository::new(db.clone()),
            reviews: ReviewRepository::new(db.clone()),
            votes: VoteRepository::new(db),
        }
    }

    /// Spot with its reviews in submission order
    pub async fn detail(&self, spot_id: &RecordId) -> AppResult<(Spot, Vec<Review>)> {
        let spot = self
            .spots
            .find_by_id(spot_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Spot {}", spot_id)))?;
        let mut reviews = self.reviews.find_by_spot(spot_id).await?;
        // A row not yet (or no longer) in review_ids is not part of the rating
        reviews.retain(|r| r.id.as_ref().is_some_and(|id| spot.review_ids.contains(id)));
        Ok((spot, reviews))
    }

    /// Append a review and fold its star into the spot's average
    ///
    /// Blank text is not an error: nothing is written and `accepted` is false.
    pub async fn submit(
        &self,
        spot_id: &RecordId,
        star: Star,
        text: &str,
        author: &str,
    ) -> AppResult<ReviewSubmitResult> {
        let spot = self
            .spots
            .find_by_id(spot_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Spot {}", spot_id)))?;

        if text.trim().is_empty() {
            tracing::debug!(spot = %spot_id, "Empty review text, nothing stored");
            return Ok(ReviewSubmitResult {
                accepted: false,
                review_id: None,
                average_star: spot.average_star,
                review_count: spot.review_ids.len(),
            });
        }
        validate_required_text(text, "text", MAX_TEXT_LEN)?;

        let review = self
            .reviews
            .create(spot_id, star, text.trim().to_string(), author.to_string())
            .await?;
        let review_id = review
            .id
            .clone()
            .ok_or_else(|| AppError::database("Created review has no id"))?;

        match self.attach(spot_id, &review_id, star).await {
            Ok(updated) => {
                tracing::info!(
                    spot = %spot_id,
                    review = %review_id,
                    star = star.value(),
                    average = updated.average_star,
                    "Review added"
                );
                Ok(ReviewSubmitResult {
                    accepted: true,
                    review_id: Some(review_id.to_string()),
                    average_star: updated.average_star,
                    review_count: updated.review_ids.len(),
                })
            }
            Err(e) => {
                // Keep the review table consistent with the spot's review_ids
                if let Err(cleanup) = self.reviews.delete(&review_id).await {
                    tracing::error!(review = %review_id, error = %cleanup, "Failed to roll back review");
                }
                Err(e)
            }
        }
    }

    /// Fold an already stored review into its spot's rating
    ///
    /// If the review row is deleted while this runs, the id is taken back out
    /// and `NotFound` is returned.
    pub async fn attach(&self, spot_id: &RecordId, review_id: &RecordId, star: Star) -> AppResult<Spot> {
        if self.reviews.find_by_id(review_id).await?.is_none() {
            return Err(AppError::not_found(format!("Review {}", review_id)));
        }

        let stored = self.swap_in(spot_id, review_id, star).await?;

        // delete() removes the row before its final detach; if that already
        // happened, nobody else will take this id out again
        if self.reviews.find_by_id(review_id).await?.is_none() {
            tracing::warn!(spot = %spot_id, review = %review_id, "Review deleted while attaching, undoing");
            self.detach(spot_id, review_id, star).await?;
            return Err(AppError::not_found(format!("Review {}", review_id)));
        }
        Ok(stored)
    }

    async fn swap_in(&self, spot_id: &RecordId, review_id: &RecordId, star: Star) -> AppResult<Spot> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let mut spot = self
                .spots
                .find_by_id(spot_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Spot {}", spot_id)))?;
            if spot.review_ids.contains(review_id) {
                return Ok(spot);
            }
            rating::add_review(&mut spot, review_id.clone(), star);
            if let Some(stored) = self.spots.compare_and_swap_rating(&spot).await? {
                return Ok(stored);
            }
            tracing::debug!(spot = %spot_id, attempt, "Rating update lost a race, retrying");
        }
        Err(RepoError::Stale(format!("Spot {} is too busy, try again", spot_id)).into())
    }

    /// Remove a review, recomputing the spot average first
    ///
    /// A review whose spot no longer exists is simply deleted. The spot is
    /// checked once more after the row is gone, so an `attach` that raced
    /// past the first check cannot leave the id behind.
    pub async fn delete(&self, review_id: &RecordId) -> AppResult<()> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Review {}", review_id)))?;
        let star = Star::new(review.star as i64)
            .ok_or_else(|| AppError::internal(format!("Stored star out of range: {}", review.star)))?;

        self.detach(&review.spot, review_id, star).await?;
        self.reviews.delete(review_id).await?;
        self.detach(&review.spot, review_id, star).await?;

        tracing::info!(spot = %review.spot, review = %review_id, "Review deleted");
        Ok(())
    }

    async fn detach(&self, spot_id: &RecordId, review_id: &RecordId, star: Star) -> AppResult<()> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let Some(mut spot) = self.spots.find_by_id(spot_id).await? else {
                return Ok(());
            };
            if !rating::remove_review(&mut spot, review_id, star) {
                return Ok(());
            }
            if self.spots.compare_and_swap_rating(&spot).await?.is_some() {
                return Ok(());
            }
            tracing::debug!(spot = %spot_id, attempt, "Rating update lost a race, retrying");
        }
        Err(RepoError::Stale(format!("Spot {} is too busy, try again", spot_id)).into())
    }

    /// Record one like/dislike per user per review
    pub async fn vote(&self, review_id: &RecordId, voter: &str, kind: VoteKind) -> AppResult<VoteResult> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Review {}", review_id)))?;

        let vote = self.votes.create(review_id, &review.spot, voter, kind).await?;

        let updated = match self.reviews.increment(review_id, kind).await {
            Ok(updated) => updated,
            Err(e) => {
                if let Some(vote_id) = &vote.id {
                    if let Err(cleanup) = self.votes.delete(vote_id).await {
                        tracing::error!(vote = %vote_id, error = %cleanup, "Failed to roll back vote");
                    }
                }
                return Err(e.into());
            }
        };

        tracing::info!(review = %review_id, voter = %voter, kind = kind.as_str(), "Vote recorded");
        Ok(VoteResult {
            review_id: review_id.to_string(),
            kind,
            like_count: updated.like_count,
            dislike_count: updated.dislike_count,
        })
    }
}
