//! Review Handlers

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use shared::models::{ReviewSubmitResult, VoteKind, VoteResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::parse_record_id;
use crate::rating::Star;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    #[serde(alias = "SpotId")]
    pub spot_id: String,
    pub star: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    #[serde(alias = "ReviewId")]
    pub review_id: String,
    pub kind: String,
}

fn parse_star(raw: &str) -> AppResult<Star> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(Star::new)
        .ok_or_else(|| AppError::validation(format!("star must be an integer from 1 to 5, got '{}'", raw)))
}

/// POST /detail/post
pub async fn post_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Form(form): Form<ReviewForm>,
) -> AppResult<Json<AppResponse<ReviewSubmitResult>>> {
    let spot_id = parse_record_id("spot", &form.spot_id)?;
    let star = parse_star(&form.star)?;

    let result = state
        .review_service()
        .submit(&spot_id, star, &form.text, &user.username)
        .await?;

    if result.accepted {
        Ok(ok_with_message(result, "Review added"))
    } else {
        Ok(ok_with_message(result, "Empty review ignored"))
    }
}

/// POST /detail/like
pub async fn vote(
    State(state): State<ServerState>,
    user: CurrentUser,
    Form(form): Form<VoteForm>,
) -> AppResult<Json<AppResponse<VoteResult>>> {
    let review_id = parse_record_id("review", &form.review_id)?;
    let kind: VoteKind = form
        .kind
        .parse()
        .map_err(|e: shared::models::ParseEnumError| AppError::validation(e.to_string()))?;

    let result = state
        .review_service()
        .vote(&review_id, &user.username, kind)
        .await?;
    Ok(ok(result))
}
