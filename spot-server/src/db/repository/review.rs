//! Review Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Review;
use crate::rating::Star;
use shared::models::VoteKind;
use shared::util::unique_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Review>> {
        let review: Option<Review> = self.base.db().select(id.clone()).await?;
        Ok(review)
    }

    /// Reviews of a spot in submission order
    pub async fn find_by_spot(&self, spot: &RecordId) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE spot = $spot ORDER BY created_at ASC")
            .bind(("spot", spot.clone()))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Create a review; the caller attaches it to the spot's rating
    pub async fn create(
        &self,
        spot: &RecordId,
        star: Star,
        text: String,
        author_username: String,
    ) -> RepoResult<Review> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE review SET
                    spot = $spot,
                    star = $star,
                    text = $text,
                    like_count = 0,
                    dislike_count = 0,
                    created_at = $created_at,
                    author_username = $author_username
                RETURN AFTER"#,
            )
            .bind(("spot", spot.clone()))
            .bind(("star", star.value()))
            .bind(("text", text))
            .bind(("created_at", unique_millis()))
            .bind(("author_username", author_username))
            .await?;

        let created: Option<Review> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Atomically bump the like or dislike counter
    pub async fn increment(&self, id: &RecordId, kind: VoteKind) -> RepoResult<Review> {
        let sql = format!("UPDATE $thing SET {} += 1 RETURN AFTER", kind.counter_field());
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("thing", id.clone()))
            .await?;

        result
            .take::<Option<Review>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    /// Hard delete a review and the votes cast on it
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                DELETE vote WHERE review = $thing;
                DELETE $thing;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", id.clone()))
            .await?
            .check()?;
        Ok(())
    }
}
