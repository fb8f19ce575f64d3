//! Authentication route handlers.
//!
//! Login and registration are proxied to the backend's credential
//! controllers; the successful login response becomes the session user,
//! and the role decides the landing page.

use agrizen_core::Role;
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
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::models::nav::Nav;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Query parameters for success-message display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
}

/// Map a redirect code to its display string. Codes rather than free text
/// travel in the URL.
fn success_message(code: &str) -> Option<String> {
    match code {
        "registered" => Some("Account created. Please sign in.".to_string()),
        _ => None,
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
    pub email: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// An already-authenticated visitor is sent straight to their role's
/// landing page.
pub async fn login_page(
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Response {
    let nav = Nav::load(&session).await;
    if let Some(user) = &nav.user {
        return Redirect::to(user.role.landing_path()).into_response();
    }

    LoginTemplate {
        nav,
        error: None,
        success: query.success.as_deref().and_then(success_message),
        email: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let email = form.email.trim().to_string();

    // Required-field validation happens before any network call.
    if email.is_empty() || form.password.is_empty() {
        return Ok(login_failure(&session, email, "Email and password are required.").await);
    }

    match state.agrigen().login(&email, &form.password).await {
        Ok(authenticated) => {
            let user = CurrentUser {
                id: authenticated.userid,
                name: authenticated.name,
                email: authenticated.email,
                role: authenticated.role,
            };
            set_current_user(&session, &user).await?;
            tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

            Ok(Redirect::to(user.role.landing_path()).into_response())
        }
        Err(AgrigenError::Api(failure)) => {
            // Surface the server's own message, as the original did.
            tracing::warn!("Login rejected for {email}: {failure}");
            Ok(login_failure(&session, email, &failure.to_string()).await)
        }
        Err(e) => {
            tracing::warn!("Login failed for {email}: {e}");
            Ok(login_failure(&session, email, agrizen_core::api::GENERIC_FAILURE).await)
        }
    }
}

async fn login_failure(session: &Session, email: String, message: &str) -> Response {
    LoginTemplate {
        nav: Nav::load(session).await,
        error: Some(message.to_string()),
        success: None,
        email,
    }
    .into_response()
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(session: Session) -> RegisterTemplate {
    RegisterTemplate {
        nav: Nav::load(&session).await,
        error: None,
    }
}

/// Handle registration form submission.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let nav = Nav::load(&session).await;

    let failure = |message: String| {
        RegisterTemplate {
            nav: nav.clone(),
            error: Some(message),
        }
        .into_response()
    };

    let first_name = form.first_name.trim();
    let email = form.email.trim();
    if first_name.is_empty() || email.is_empty() {
        return Ok(failure("Name and email are required.".to_string()));
    }
    if form.password.len() < 8 {
        return Ok(failure(
            "Password must be at least 8 characters.".to_string(),
        ));
    }

    // Accounts can register as Farmer or Supplier; Admin is provisioned
    // through the user management panel only.
    let role = match form.role.parse::<Role>() {
        Ok(role @ (Role::Farmer | Role::Supplier)) => role,
        _ => return Ok(failure("Please choose a valid account type.".to_string())),
    };

    let name = if form.last_name.trim().is_empty() {
        first_name.to_string()
    } else {
        format!("{first_name} {}", form.last_name.trim())
    };

    match state
        .agrigen()
        .register(&name, email, &form.password, role)
        .await
    {
        Ok(()) => Ok(Redirect::to("/login?success=registered").into_response()),
        Err(AgrigenError::Api(f)) => {
            tracing::warn!("Registration rejected for {email}: {f}");
            Ok(failure(f.to_string()))
        }
        Err(e) => {
            tracing::warn!("Registration failed for {email}: {e}");
            Ok(failure(agrizen_core::api::GENERIC_FAILURE.to_string()))
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout: clear the session identity and everything cached under
/// it, then return to the login page.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;

    // Also destroy the cart snapshot and address book
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Ok(Redirect::to("/login"))
}
