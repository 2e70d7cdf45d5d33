//! Search Routes
//!
//! GET /search returns the form choices; POST /search runs the filter.

use axum::{Form, Json, Router, extract::State, routing::get};
use shared::models::SpotFormOptions;

use crate::core::ServerState;
use crate::db::models::SpotView;
use crate::search::{SearchForm, SpotFilter};
use crate::utils::{AppResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/search", get(search_form).post(search))
}

async fn search_form() -> Json<AppResponse<SpotFormOptions>> {
    ok(SpotFormOptions::default())
}

async fn search(
    State(state): State<ServerState>,
    Form(form): Form<SearchForm>,
) -> AppResult<Json<AppResponse<Vec<SpotView>>>> {
    let filter = SpotFilter::from_form(&form)?;
    let spots = state.spots().search(&filter).await?;
    debug_assert!(spots.iter().all(|s| filter.matches(s)), "store and filter disagree");
    tracing::debug!(constrained = filter.constrained(), hits = spots.len(), "Spot search");
    Ok(ok(spots.into_iter().map(SpotView::from).collect()))
}
