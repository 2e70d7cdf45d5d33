//! Moderator Routes
//!
//! Both routes sit behind [`require_moderator`]: the role comes from the
//! caller's session, never from server-wide state.

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::require_moderator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/moderator_home", post(handler::delete_spot))
        .route("/moderator_detail", post(handler::delete_review))
        .route_layer(middleware::from_fn(require_moderator))
}
