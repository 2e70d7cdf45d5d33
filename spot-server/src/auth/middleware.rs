//! 认证中间件
//!
//! 为会话认证和版主授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{HeaderMap, Method, Uri};

use crate::AppError;
use crate::auth::session::{TokenSource, request_token};
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// 不需要登录的写操作
const PUBLIC_POST_ROUTES: &[&str] = &["/signup", "/login", "/search"];

/// 判断请求是否可以匿名访问
///
/// 除 `/edit/{id}` 外的 GET 都是公开的；POST 只有注册、登录和搜索公开。
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    if method == Method::GET || method == Method::HEAD {
        return !path.starts_with("/edit/");
    }
    method == Method::POST && PUBLIC_POST_ROUTES.contains(&path)
}

/// 从 Cookie 或 `Authorization: Bearer` 头解析当前用户
pub fn authenticate(
    jwt_service: &JwtService,
    headers: &HeaderMap,
    uri: &Uri,
) -> Result<CurrentUser, AppError> {
    let token = match request_token(headers) {
        TokenSource::Bearer(token) | TokenSource::Cookie(token) => token,
        TokenSource::Malformed => {
            return Err(AppError::invalid_token("Invalid authorization header"));
        }
        TokenSource::Missing => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => Ok(CurrentUser::from(claims)),
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", uri)
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// 认证中间件 - 要求用户登录
///
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无会话 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(state.get_jwt_service(), req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 版主中间件 - 要求会话带有版主角色
///
/// # 错误
///
/// 未登录返回 401，非版主返回 403 Forbidden
pub async fn require_moderator(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_moderator() {
        security_log!(
            "WARN",
            "moderator_required",
            user_id = user.id.clone(),
            username = user.username.clone(),
            uri = format!("{:?}", req.uri())
        );
        return Err(AppError::forbidden("Moderator role required"));
    }

    Ok(next.run(req).await)
}
