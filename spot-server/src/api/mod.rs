//! HTTP API
//!
//! 每个子模块提供一个 `router()`，在 [`crate::services::web::build_routes`] 中合并。

pub mod auth;
pub mod health;
pub mod moderator;
pub mod reviews;
pub mod search;
pub mod spots;
pub mod upload;
