//! Upload Routes
//!
//! Serves stored spot images. Uploading happens as part of the spot form.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use http::header;

use crate::core::ServerState;
use crate::utils::AppResult;

/// Serve uploaded file handler
async fn serve_uploaded_file(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let (content, mime) = state.images().read(&filename).await?;
    Ok((
        http::StatusCode::OK,
        [(header::CONTENT_TYPE, mime)],
        content,
    ))
}

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new().route("/uploads/{filename}", get(serve_uploaded_file))
}
