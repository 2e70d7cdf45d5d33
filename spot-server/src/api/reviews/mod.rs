//! Review Routes
//!
//! - POST /detail/post: add a review (login required)
//! - POST /detail/like: like or dislike a review (login required)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/detail/post", post(handler::post_review))
        .route("/detail/like", post(handler::vote))
}
