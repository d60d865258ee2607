//! Registration, login, and logout

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use diarylite_common::accounts::{
    generate_session_token, hash_password, validate_registration, verify_password, Registration,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::auth::{clear_session_cookie, session_cookie, session_token};
use crate::db::{sessions, users};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Emails are matched case-insensitively
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// POST /api/register
///
/// Creates the account with default preferences and logs the user in.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut form): ApiJson<Registration>,
) -> ApiResult<Response> {
    form.firstname = form.firstname.trim().to_string();
    form.lastname = form.lastname.trim().to_string();
    form.email = normalize_email(&form.email);

    validate_registration(&form).map_err(ApiError::BadRequest)?;

    if users::email_exists(&state.db, &form.email).await? {
        return Err(ApiError::Conflict(
            "User with the same email already exists".to_string(),
        ));
    }

    let password = hash_password(&form.password);
    let new_user = users::NewUser {
        firstname: &form.firstname,
        lastname: &form.lastname,
        email: &form.email,
        password: &password,
        created_at: Local::now().naive_local(),
    };

    let user_id = match users::create_user(&state.db, &new_user).await {
        Ok(id) => id,
        // Lost a race with a concurrent registration for the same email
        Err(diarylite_common::Error::Database(sqlx::Error::Database(db_err)))
            if db_err.is_unique_violation() =>
        {
            return Err(ApiError::Conflict(
                "User with the same email already exists".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let token = generate_session_token();
    sessions::create_session(&state.db, &token, user_id).await?;

    info!("Registered user {}", user_id);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(AccountResponse {
            message: "Registered".to_string(),
            user_id,
        }),
    )
        .into_response())
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    let email = normalize_email(&request.email);

    let user = users::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("No account registered with that email".to_string()))?;

    if !verify_password(&request.password, &user.password_hash, &user.password_salt) {
        warn!("Failed login for user {}", user.id);
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }

    sessions::prune_expired(&state.db).await?;
    let token = generate_session_token();
    sessions::create_session(&state.db, &token, user.id).await?;

    info!("User {} logged in", user.id);

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(AccountResponse {
            message: "Logged in".to_string(),
            user_id: user.id,
        }),
    )
        .into_response())
}

/// POST /api/logout
///
/// Always succeeds; an unknown or missing session is simply cleared.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) = session_token(&headers) {
        if sessions::delete_session(&state.db, &token).await? {
            info!("Session ended");
        }
    }

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
        .into_response())
}
