//! 认证授权模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_moderator`] - 版主检查中间件
//! - [`session`] - 会话 Cookie

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod session;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, ROLE_MODERATOR, ROLE_USER};
pub use middleware::{require_auth, require_moderator};
