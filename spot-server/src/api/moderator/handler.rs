//! Moderator Handlers

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::parse_record_id;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct DeleteSpotForm {
    #[serde(alias = "SpotId")]
    pub spot_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteReviewForm {
    #[serde(alias = "ReviewId")]
    pub review_id: String,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
}

/// POST /moderator_home - delete a spot with its reviews and votes
pub async fn delete_spot(
    State(state): State<ServerState>,
    user: CurrentUser,
    Form(form): Form<DeleteSpotForm>,
) -> AppResult<Json<AppResponse<Deleted>>> {
    let spot_id = parse_record_id("spot", &form.spot_id)?;
    if !state.spots().delete_cascade(&spot_id).await? {
        return Err(AppError::not_found(format!("Spot {}", spot_id)));
    }

    tracing::info!(spot = %spot_id, moderator = %user.username, "Spot deleted");
    Ok(ok_with_message(
        Deleted {
            id: spot_id.to_string(),
        },
        "Spot deleted",
    ))
}

/// POST /moderator_detail - delete a review and recompute its spot's rating
pub async fn delete_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Form(form): Form<DeleteReviewForm>,
) -> AppResult<Json<AppResponse<Deleted>>> {
    let review_id = parse_record_id("review", &form.review_id)?;
    state.review_service().delete(&review_id).await?;

    tracing::info!(review = %review_id, moderator = %user.username, "Review removed by moderator");
    Ok(ok_with_message(
        Deleted {
            id: review_id.to_string(),
        },
        "Review deleted",
    ))
}
