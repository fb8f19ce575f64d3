//! Profile management for the logged-in user.
//!
//! Edits go to the profile controller; a successful name/email update
//! rewrites the session identity so the chrome reflects it immediately.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::agrigen::AgrigenError;
use crate::error::Result;
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::CurrentUser;
use crate::models::nav::Nav;
use crate::state::AppState;

/// Profile form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
}

/// Password change form data.
#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for success-message display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
}

fn success_message(code: &str) -> Option<String> {
    match code {
        "profile" => Some("Profile updated.".to_string()),
        "password" => Some("Password changed.".to_string()),
        _ => None,
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub user: CurrentUser,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the profile page.
pub async fn show(
    RequireAuth(user): RequireAuth,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> ProfileTemplate {
    ProfileTemplate {
        nav: Nav::load(&session).await,
        user,
        error: None,
        success: query.success.as_deref().and_then(success_message),
    }
}

async fn failure(session: &Session, user: CurrentUser, message: String) -> Response {
    ProfileTemplate {
        nav: Nav::load(session).await,
        user,
        error: Some(message),
        success: None,
    }
    .into_response()
}

/// Update name and email.
#[instrument(skip(state, session, form))]
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let name = form.name.trim().to_string();
    let email = form.email.trim().to_string();
    if name.is_empty() || email.is_empty() {
        return Ok(failure(&session, user, "Name and email are required.".to_string()).await);
    }

    match state.agrigen().update_profile(user.id, &name, &email).await {
        Ok(()) => {
            // Rewrite the cached identity so the chrome updates immediately.
            let updated = CurrentUser {
                id: user.id,
                name,
                email,
                role: user.role,
            };
            set_current_user(&session, &updated).await?;
            Ok(Redirect::to("/profile?success=profile").into_response())
        }
        Err(AgrigenError::Api(f)) => Ok(failure(&session, user, f.to_string()).await),
        Err(e) => Err(e.into()),
    }
}

/// Change the password.
#[instrument(skip(state, session, form))]
pub async fn change_password(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PasswordForm>,
) -> Result<Response> {
    if form.password.len() < 8 {
        return Ok(failure(
            &session,
            user,
            "Password must be at least 8 characters.".to_string(),
        )
        .await);
    }
    if form.password != form.password_confirm {
        return Ok(failure(&session, user, "Passwords do not match.".to_string()).await);
    }

    match state.agrigen().change_password(user.id, &form.password).await {
        Ok(()) => Ok(Redirect::to("/profile?success=password").into_response()),
        Err(AgrigenError::Api(f)) => Ok(failure(&session, user, f.to_string()).await),
        Err(e) => Err(e.into()),
    }
}
