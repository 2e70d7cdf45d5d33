//! 服务层
//!
//! - [`ReviewService`] - 评论、评分聚合与投票
//! - [`ImageStore`] - 图片上传与读取
//! - [`web`] - 路由与 HTTP 服务器

pub mod web;
pub mod images;
pub mod review;

pub use web::{build_app, start_server};
pub use images::{ImageStore, StoredImage, ValidatedImage};
pub use review::ReviewService;
