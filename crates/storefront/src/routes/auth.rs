//! Auth route handlers.
//!
//! Credentials go straight through to the backend auth API; only the
//! returned identity is kept, in the session.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use spotfit_core::Email;

use crate::api::RegisterRequest;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Register request body.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Identity payload returned after login/register.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: CurrentUser,
}

/// Log in via the backend auth API.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionView>> {
    let email = Email::parse(&form.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let auth_session = state.auth().login(&email, &form.password).await?;
    let user: CurrentUser = auth_session.user.into();

    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(SessionView { user }))
}

/// Register via the backend auth API.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RegisterForm>,
) -> Result<Json<SessionView>> {
    let email = Email::parse(&form.email)
        .map_err(|e| AppError::BadRequest(format!("invalid email: {e}")))?;

    let auth_session = state
        .auth()
        .register(&RegisterRequest {
            name: form.name,
            email,
            password: form.password,
        })
        .await?;
    let user: CurrentUser = auth_session.user.into();

    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    Ok(Json(SessionView { user }))
}

/// Log out: clear the session identity.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<axum::http::StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(axum::http::StatusCode::NO_CONTENT)
}
