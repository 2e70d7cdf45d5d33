//! Vote Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Vote;
use shared::models::VoteKind;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct VoteRepository {
    base: BaseRepository,
}

impl VoteRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Vote cast by `voter` on `review`, if any
    pub async fn find(&self, review: &RecordId, voter: &str) -> RepoResult<Option<Vote>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM vote WHERE review = $review AND voter = $voter LIMIT 1")
            .bind(("review", review.clone()))
            .bind(("voter", voter.to_string()))
            .await?;
        let votes: Vec<Vote> = result.take(0)?;
        Ok(votes.into_iter().next())
    }

    /// Record a vote; a second vote by the same user on the same review is a
    /// [`RepoError::Duplicate`]
    pub async fn create(
        &self,
        review: &RecordId,
        spot: &RecordId,
        voter: &str,
        kind: VoteKind,
    ) -> RepoResult<Vote> {
        if self.find(review, voter).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "'{}' already voted on {}",
                voter, review
            )));
        }

        // The unique index still catches a racing duplicate
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE vote SET
                    review = $review,
                    spot = $spot,
                    voter = $voter,
                    kind = $kind,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("review", review.clone()))
            .bind(("spot", spot.clone()))
            .bind(("voter", voter.to_string()))
            .bind(("kind", kind))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<Vote> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create vote".to_string()))
    }

    /// Remove a vote (used to undo a vote whose review vanished)
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", id.clone()))
            .await?
            .check()?;
        Ok(())
    }
}
