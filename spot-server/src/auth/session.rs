//! Session cookie
//!
//! The signed JWT travels in an `HttpOnly; SameSite=Lax` cookie so the
//! browser never exposes it to scripts.

use http::HeaderMap;
use http::header::{AUTHORIZATION, COOKIE};

use crate::auth::JwtService;

pub const SESSION_COOKIE: &str = "spot_session";

/// `Set-Cookie` value carrying the token
pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age_seconds.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Session token from the cookie header, if any
pub fn token_from_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Where the request's token came from
#[derive(Debug, PartialEq, Eq)]
pub enum TokenSource<'a> {
    Bearer(&'a str),
    Cookie(&'a str),
    /// An `Authorization` header that is not a bearer token
    Malformed,
    Missing,
}

/// Bearer header wins over the cookie
pub fn request_token(headers: &HeaderMap) -> TokenSource<'_> {
    if let Some(header) = headers.get(AUTHORIZATION) {
        return match header.to_str().ok().and_then(JwtService::extract_from_header) {
            Some(token) => TokenSource::Bearer(token),
            None => TokenSource::Malformed,
        };
    }
    match token_from_cookies(headers) {
        Some(token) => TokenSource::Cookie(token),
        None => TokenSource::Missing,
    }
}
