//! Spot Handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::SpotFormOptions;

use super::form::{SpotForm, read_spot_multipart};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, SpotView};
use crate::db::repository::parse_record_id;
use crate::services::{ImageStore, StoredImage};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(rename = "SpotId", alias = "spot_id")]
    pub spot_id: String,
}

/// Spot page: the spot plus its reviews
#[derive(Debug, Serialize)]
pub struct SpotDetail {
    pub spot: SpotView,
    pub reviews: Vec<Review>,
}

/// Edit page: current values plus the allowed choices
#[derive(Debug, Serialize)]
pub struct SpotEdit {
    pub spot: SpotView,
    pub options: SpotFormOptions,
}

/// Validate the optional image; nothing is written yet
fn check_image(
    images: &ImageStore,
    form: &SpotForm,
    image: Option<super::form::UploadedFile>,
) -> AppResult<Option<crate::services::ValidatedImage>> {
    image
        .map(|file| images.validate(&file.filename, file.data))
        .transpose()
        .map_err(|e| form.reject(e))
}

/// Remove an image written for a spot write that failed
async fn discard(images: &ImageStore, stored: Option<&StoredImage>) {
    if let Some(stored) = stored {
        images.discard(stored).await;
    }
}

/// GET / - all spots, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<SpotView>>>> {
    let spots = state.spots().find_all().await?;
    Ok(ok(spots.into_iter().map(SpotView::from).collect()))
}

/// GET /create - choices for the form
pub async fn create_form() -> Json<AppResponse<SpotFormOptions>> {
    ok(SpotFormOptions::default())
}

/// POST /create
///
/// Nothing is written (image included) unless every field is valid.
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<SpotView>>> {
    let (form, image) = read_spot_multipart(multipart).await?;
    let draft = form.validate()?;
    let image = check_image(state.images(), &form, image)?;

    let stored = match image {
        Some(image) => Some(state.images().store(image).await?),
        None => None,
    };
    let image_ref = stored.as_ref().map(|s| s.name.clone());

    let spot = match state.spots().create(draft, image_ref).await {
        Ok(spot) => spot,
        Err(e) => {
            discard(state.images(), stored.as_ref()).await;
            return Err(e.into());
        }
    };
    tracing::info!(spot = %spot.id_string(), name = %spot.name, by = %user.username, "Spot created");
    Ok(ok_with_message(SpotView::from(spot), "Spot created"))
}

/// GET /detail?SpotId=
pub async fn detail(
    State(state): State<ServerState>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<AppResponse<SpotDetail>>> {
    let spot_id = parse_record_id("spot", &query.spot_id)?;
    let (spot, reviews) = state.review_service().detail(&spot_id).await?;
    Ok(ok(SpotDetail {
        spot: SpotView::from(spot),
        reviews,
    }))
}

/// GET /edit/{id} (moderator)
pub async fn edit_form(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<SpotEdit>>> {
    let spot_id = parse_record_id("spot", &id)?;
    let spot = state
        .spots()
        .find_by_id(&spot_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Spot {}", spot_id)))?;
    Ok(ok(SpotEdit {
        spot: SpotView::from(spot),
        options: SpotFormOptions::default(),
    }))
}

/// POST /edit/{id} (moderator)
///
/// Replaces the descriptive fields; reviews and rating are untouched. Without
/// a new image the current one is kept.
pub async fn edit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<AppResponse<SpotView>>> {
    let spot_id = parse_record_id("spot", &id)?;
    let (form, image) = read_spot_multipart(multipart).await?;
    let draft = form.validate()?;
    let image = check_image(state.images(), &form, image)?;

    let stored = match image {
        Some(image) => Some(state.images().store(image).await?),
        None => None,
    };
    let image_ref = stored.as_ref().map(|s| s.name.clone());

    // update reports NotFound for a missing (or just deleted) spot
    let spot = match state.spots().update(&spot_id, draft, image_ref).await {
        Ok(spot) => spot,
        Err(e) => {
            discard(state.images(), stored.as_ref()).await;
            return Err(e.into());
        }
    };
    tracing::info!(spot = %spot_id, by = %user.username, "Spot edited");
    Ok(ok_with_message(SpotView::from(spot), "Spot updated"))
}
