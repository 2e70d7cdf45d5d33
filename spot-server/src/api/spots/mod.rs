//! Spot Routes
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | / | GET | 无 |
//! | /create | GET | 无 |
//! | /create | POST | 登录 |
//! | /detail?SpotId= | GET | 无 |
//! | /edit/{id} | GET, POST | 版主 |

mod form;
mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_moderator;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    let moderator_routes = Router::new()
        .route("/edit/{id}", get(handler::edit_form).post(handler::edit))
        .route_layer(middleware::from_fn(require_moderator));

    Router::new()
        .route("/", get(handler::list))
        .route("/create", get(handler::create_form).post(handler::create))
        .route("/detail", get(handler::detail))
        .merge(moderator_routes)
}
