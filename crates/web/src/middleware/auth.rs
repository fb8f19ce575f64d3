//! Authentication and role guards.
//!
//! Provides extractors for requiring a logged-in user - optionally with a
//! specific role - in route handlers. All role-gated routes share one
//! policy: no session redirects to the login page, a session with the
//! wrong role redirects to the home page.

use agrizen_core::Role;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Rejection shared by every guard extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// No session user: redirect to the login page.
    RedirectToLogin,
    /// Session user present but not allowed here: redirect home.
    RedirectHome,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
        }
    }
}

/// The single role policy behind the guard extractors.
///
/// # Errors
///
/// Returns the redirect decision when the user is absent or the role is
/// not in the allow-list.
pub fn check_role(user: Option<&CurrentUser>, allowed: &[Role]) -> Result<(), GuardRejection> {
    match user {
        None => Err(GuardRejection::RedirectToLogin),
        Some(user) if allowed.contains(&user.role) => Ok(()),
        Some(_) => Err(GuardRejection::RedirectHome),
    }
}

/// Read the current user out of the request's session, if any.
///
/// A malformed stored value reads as "no session".
async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Extractor that requires any authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn cart_page(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Cart for {}", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).await;
        check_role(user.as_ref(), &Role::ALL)?;
        // check_role guarantees presence on success
        user.map(Self).ok_or(GuardRejection::RedirectToLogin)
    }
}

/// Extractor that requires an `Admin` session for the admin dashboard.
pub struct RequireAdmin(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).await;
        check_role(user.as_ref(), &[Role::Admin])?;
        user.map(Self).ok_or(GuardRejection::RedirectToLogin)
    }
}

/// Extractor that requires a `Supplier` session for the supplier dashboard.
pub struct RequireSupplier(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireSupplier
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).await;
        check_role(user.as_ref(), &[Role::Supplier])?;
        user.map(Self).ok_or(GuardRejection::RedirectToLogin)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in; the public pages use it to pick their chrome.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrizen_core::UserId;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            name: "Dhanya".to_string(),
            email: "dhanya@farm.example".to_string(),
            role,
        }
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        for allowed in [&Role::ALL[..], &[Role::Admin], &[Role::Supplier]] {
            assert_eq!(
                check_role(None, allowed),
                Err(GuardRejection::RedirectToLogin)
            );
        }
    }

    #[test]
    fn test_wrong_role_redirects_home() {
        // Every role outside a dashboard's allow-list is turned away to "/".
        for role in [Role::Farmer, Role::Supplier] {
            let u = user(role);
            assert_eq!(
                check_role(Some(&u), &[Role::Admin]),
                Err(GuardRejection::RedirectHome)
            );
        }
        for role in [Role::Farmer, Role::Admin] {
            let u = user(role);
            assert_eq!(
                check_role(Some(&u), &[Role::Supplier]),
                Err(GuardRejection::RedirectHome)
            );
        }
    }

    #[test]
    fn test_matching_role_is_admitted() {
        let admin = user(Role::Admin);
        assert_eq!(check_role(Some(&admin), &[Role::Admin]), Ok(()));

        let supplier = user(Role::Supplier);
        assert_eq!(check_role(Some(&supplier), &[Role::Supplier]), Ok(()));
    }

    #[test]
    fn test_any_recognized_role_passes_plain_auth() {
        for role in Role::ALL {
            let u = user(role);
            assert_eq!(check_role(Some(&u), &Role::ALL), Ok(()));
        }
    }
}
