//! Spot Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Spot, SpotDraft};
use crate::search::SpotFilter;
use shared::util::unique_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SpotRepository {
    base: BaseRepository,
}

impl SpotRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all spots, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Spot>> {
        let spots: Vec<Spot> = self
            .base
            .db()
            .query("SELECT * FROM spot ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(spots)
    }

    /// Find spot by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Spot>> {
        let spot: Option<Spot> = self.base.db().select(id.clone()).await?;
        Ok(spot)
    }

    /// Run a search filter, newest first
    pub async fn search(&self, filter: &SpotFilter) -> RepoResult<Vec<Spot>> {
        let query = filter.to_query();
        let mut request = self.base.db().query(query.sql);
        for (name, value) in query.params {
            request = request.bind((name, value));
        }
        let spots: Vec<Spot> = request.await?.take(0)?;
        Ok(spots)
    }

    /// Create a new spot with no reviews
    pub async fn create(&self, draft: SpotDraft, image_ref: Option<String>) -> RepoResult<Spot> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE spot SET
                    name = $name,
                    address = $address,
                    location = $location,
                    spot_type = $spot_type,
                    purchase_required = $purchase_required,
                    noise_level = $noise_level,
                    description = $description,
                    image_ref = $image_ref,
                    created_at = $created_at,
                    review_ids = [],
                    average_star = 0.0,
                    version = 0
                RETURN AFTER"#,
            )
            .bind(("name", draft.name))
            .bind(("address", draft.address))
            .bind(("location", draft.location))
            .bind(("spot_type", draft.spot_type))
            .bind(("purchase_required", draft.purchase_required))
            .bind(("noise_level", draft.noise_level))
            .bind(("description", draft.description))
            .bind(("image_ref", image_ref))
            .bind(("created_at", unique_millis()))
            .await?;

        let created: Option<Spot> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create spot".to_string()))
    }

    /// Replace the descriptive fields of a spot
    ///
    /// Reviews and rating are left alone. `image_ref = None` keeps the
    /// current image.
    pub async fn update(
        &self,
        id: &RecordId,
        draft: SpotDraft,
        image_ref: Option<String>,
    ) -> RepoResult<Spot> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name,
                    address = $address,
                    location = $location,
                    spot_type = $spot_type,
                    purchase_required = $purchase_required,
                    noise_level = $noise_level,
                    description = $description,
                    image_ref = IF $has_image THEN $image_ref ELSE image_ref END,
                    version += 1
                RETURN AFTER"#,
            )
            .bind(("thing", id.clone()))
            .bind(("name", draft.name))
            .bind(("address", draft.address))
            .bind(("location", draft.location))
            .bind(("spot_type", draft.spot_type))
            .bind(("purchase_required", draft.purchase_required))
            .bind(("noise_level", draft.noise_level))
            .bind(("description", draft.description))
            .bind(("has_image", image_ref.is_some()))
            .bind(("image_ref", image_ref))
            .await?;

        result
            .take::<Option<Spot>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Spot {} not found", id)))
    }

    /// Write new rating fields if the stored version still equals `spot.version`
    ///
    /// Returns the stored spot on success, `None` if another writer got there
    /// first (or the spot is gone).
    pub async fn compare_and_swap_rating(&self, spot: &Spot) -> RepoResult<Option<Spot>> {
        match self.swap_rating(spot).await {
            Err(RepoError::Stale(msg)) => {
                tracing::debug!(error = %msg, "Rating write conflicted");
                Ok(None)
            }
            other => other,
        }
    }

    async fn swap_rating(&self, spot: &Spot) -> RepoResult<Option<Spot>> {
        let id = spot
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Spot without id".to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    average_star = $average_star,
                    review_ids = $review_ids,
                    version = $next_version
                WHERE version = $expected_version
                RETURN AFTER"#,
            )
            .bind(("thing", id))
            .bind(("average_star", spot.average_star))
            .bind(("review_ids", spot.review_ids.clone()))
            .bind(("next_version", spot.version + 1))
            .bind(("expected_version", spot.version))
            .await?;

        let updated: Vec<Spot> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Delete a spot together with its reviews and their votes
    ///
    /// Returns `false` when the spot did not exist.
    pub async fn delete_cascade(&self, id: &RecordId) -> RepoResult<bool> {
        if self.find_by_id(id).await?.is_none() {
            return Ok(false);
        }

        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                DELETE vote WHERE spot = $thing;
                DELETE review WHERE spot = $thing;
                DELETE $thing;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", id.clone()))
            .await?
            .check()?;
        Ok(true)
    }
}
