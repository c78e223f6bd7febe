//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use shared::StatusMessage;

use super::FormOrJson;
use crate::error::AppError;
use crate::middleware::{CurrentUser, SESSION_COOKIE};
use crate::services::auth::{AuthSession, SignupInput};
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub username: String,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Signup endpoint handler; the new account is signed in immediately
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    FormOrJson(body): FormOrJson<SignupInput>,
) -> Result<(StatusCode, CookieJar, Json<AuthSession>), AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.signup(body).await?;

    let jar = jar.add(session_cookie(session.access_token.clone()));
    Ok((StatusCode::CREATED, jar, Json(session)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    FormOrJson(body): FormOrJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthSession>), AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.login(&body.username, &body.password).await?;

    tracing::info!("User {} logged in", session.user.username);
    let jar = jar.add(session_cookie(session.access_token.clone()));
    Ok((jar, Json(session)))
}

/// Logout endpoint handler; clears the session cookie
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<StatusMessage>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(StatusMessage::info("You have been logged out.")))
}

/// Current session endpoint handler
pub async fn me(CurrentUser(user): CurrentUser) -> Json<SessionInfo> {
    Json(SessionInfo {
        user_id: user.user_id.to_string(),
        username: user.username,
    })
}
