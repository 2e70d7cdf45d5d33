//! Authentication Handlers
//!
//! Handles signup, login and logout. The issued token goes into the session
//! cookie and the response body.

use std::time::Duration;

use axum::{Form, Json, extract::State, response::IntoResponse};
use http::header::SET_COOKIE;

use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::core::ServerState;
use crate::db::models::{User, UserCreate};
use crate::db::repository::RepoError;
use crate::security_log;
use crate::utils::validation::{validate_password, validate_username};
use crate::utils::{AppError, AppResponse, ok_with_message};

use shared::client::{LoginRequest, LoginResponse, SignupRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Issue a token for `user` and wrap it in the login response
fn issue_session(
    state: &ServerState,
    user: &User,
) -> Result<([(http::HeaderName, String); 1], LoginResponse), AppError> {
    let user_id = user
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(&user_id, &user.username, user.role())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    let cookie = session_cookie(
        &token,
        jwt_service.session_seconds(),
        state.config.is_production(),
    );

    let response = LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: user.username.clone(),
            is_moderator: user.is_moderator,
        },
    };
    Ok(([(SET_COOKIE, cookie)], response))
}

/// Signup handler
///
/// Creates a regular (non-moderator) account and signs it in
pub async fn signup(
    State(state): State<ServerState>,
    Form(req): Form<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = req.username.trim().to_string();
    validate_username(&username)?;
    validate_password(&req.password)?;

    let user = state
        .users()
        .create(UserCreate {
            username: username.clone(),
            password: req.password,
            is_moderator: false,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => {
                security_log!("INFO", "signup_duplicate", username = username.clone());
                AppError::Auth("Username already taken".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!(username = %user.username, "User signed up");

    let (headers, response) = issue_session(&state, &user)?;
    Ok((headers, ok_with_message(response, "Signed up")))
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Form(req): Form<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = req.username.trim().to_string();
    let user = state.users().find_by_username(&username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                security_log!("WARN", "login_failed", username = username.clone(), reason = "invalid_credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            security_log!("WARN", "login_failed", username = username.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    tracing::info!(
        username = %user.username,
        role = %user.role(),
        "User logged in successfully"
    );

    let (headers, response) = issue_session(&state, &user)?;
    Ok((headers, ok_with_message(response, "Logged in")))
}

/// Logout handler
///
/// Sessions are stateless tokens; logging out drops the cookie.
pub async fn logout() -> impl IntoResponse {
    tracing::info!("Session cookie cleared");
    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(AppResponse::<()> {
            code: "E0000".to_string(),
            message: "Logged out".to_string(),
            data: None,
        }),
    )
}
